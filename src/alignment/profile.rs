use crate::section::Section;
use std::collections::BTreeMap;

/// Foreground ink found at one scanning coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Column {
    pub coord: i32,
    /// Ink-weighted center of the runs at this coordinate.
    pub pos: f64,
    /// Total run length at this coordinate.
    pub ink: f64,
}

/// Member runs aggregated per coordinate, sorted by coordinate.
#[derive(Clone, Debug, Default)]
pub struct Profile {
    columns: Vec<Column>,
}

impl Profile {
    pub fn from_sections<'a, I>(sections: I) -> Self
    where
        I: IntoIterator<Item = &'a Section>,
    {
        let mut acc: BTreeMap<i32, (f64, f64)> = BTreeMap::new();
        for section in sections {
            for (coord, run) in section.runs_with_coord() {
                if run.length == 0 {
                    continue;
                }
                let w = run.length as f64;
                let entry = acc.entry(coord).or_insert((0.0, 0.0));
                entry.0 += w * run.center();
                entry.1 += w;
            }
        }
        let columns = acc
            .into_iter()
            .map(|(coord, (sum_pos, ink))| Column {
                coord,
                pos: sum_pos / ink,
                ink,
            })
            .collect();
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn first_coord(&self) -> Option<i32> {
        self.columns.first().map(|c| c.coord)
    }

    pub fn last_coord(&self) -> Option<i32> {
        self.columns.last().map(|c| c.coord)
    }

    /// Mean ink per covered column.
    pub fn mean_ink(&self) -> f64 {
        if self.columns.is_empty() {
            return 0.0;
        }
        self.columns.iter().map(|c| c.ink).sum::<f64>() / self.columns.len() as f64
    }
}
