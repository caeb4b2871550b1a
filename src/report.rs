//! Read-only summaries for reporting and debugging.

use crate::filament::{Filament, FilamentId};
use crate::section::{Orientation, SectionId};
use serde::Serialize;
use std::fmt;

/// Snapshot of one filament: extent, fit quality, ancestry and members.
#[derive(Clone, Debug, Serialize)]
pub struct FilamentSummary {
    pub id: FilamentId,
    pub orientation: Orientation,
    pub start: Option<[f64; 2]>,
    pub stop: Option<[f64; 2]>,
    pub mean_distance: Option<f64>,
    /// Representative that absorbed this filament, if any.
    pub ancestor: Option<FilamentId>,
    pub ref_distance: Option<f64>,
    pub weight: u64,
    pub true_length: i64,
    pub members: Vec<SectionId>,
}

impl FilamentSummary {
    pub fn from_filament(filament: &Filament, ancestor: Option<FilamentId>) -> Self {
        Self {
            id: filament.id(),
            orientation: filament.orientation(),
            start: filament.start_point().ok(),
            stop: filament.stop_point().ok(),
            mean_distance: filament.mean_distance().ok(),
            ancestor,
            ref_distance: filament.ref_distance(),
            weight: filament.weight(),
            true_length: filament.true_length(),
            members: filament.member_ids().collect(),
        }
    }
}

impl fmt::Display for FilamentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        match (self.start, self.stop) {
            (Some(start), Some(stop)) => write!(
                f,
                " start[x={:.1},y={:.1}] stop[x={:.1},y={:.1}]",
                start[0], start[1], stop[0], stop[1]
            )?,
            _ => write!(f, " empty")?,
        }
        if let Some(dist) = self.mean_distance {
            write!(f, " meanDist:{dist:.3}")?;
        }
        if let Some(ancestor) = self.ancestor {
            write!(f, " anc:{ancestor}")?;
        }
        if let Some(ref_distance) = self.ref_distance {
            write!(f, " refDist:{ref_distance:.1}")?;
        }
        write!(f, " sections:{}", self.members.len())
    }
}

/// Outcome of building filaments on one sheet.
#[derive(Clone, Debug, Serialize)]
pub struct SheetReport {
    pub sheet: usize,
    pub sections: usize,
    pub filaments_created: usize,
    pub merges: usize,
    pub kept: Vec<FilamentSummary>,
    pub discarded: Vec<FilamentId>,
    pub elapsed_ms: f64,
}

impl fmt::Display for SheetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sheet {}: {} sections -> {} filaments, {} merges, {} kept, {} discarded ({:.3} ms)",
            self.sheet,
            self.sections,
            self.filaments_created,
            self.merges,
            self.kept.len(),
            self.discarded.len(),
            self.elapsed_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::FilamentArena;
    use crate::scale::Scale;
    use crate::section::{Run, Section};
    use std::sync::Arc;

    #[test]
    fn summary_mentions_extent_and_ancestor() {
        let mut arena = FilamentArena::new(Scale::new(20.0, 4.0).expect("scale"));
        let mk = |id: u32, first: i32| {
            Arc::new(Section::new(
                SectionId(id),
                Orientation::Horizontal,
                first,
                vec![Run::new(48, 4); 10],
            ))
        };
        let a = arena.seed(mk(0, 0)).expect("seed");
        let b = arena.seed(mk(1, 10)).expect("seed");
        arena.include(a, b).expect("merge");
        arena.set_ref_distance(a, 7.0).expect("set");

        let text = arena.summary(a).expect("summary").to_string();
        assert!(text.starts_with("F0 start[x=0.0,y=50.0] stop[x=19.0,y=50.0]"), "{text}");
        assert!(text.contains("refDist:7.0"), "{text}");
        assert!(text.ends_with("sections:2"), "{text}");

        let absorbed = arena.summary(b).expect("summary");
        assert_eq!(absorbed.ancestor, Some(a));
        assert!(absorbed.to_string().contains("anc:F0"));
    }

    #[test]
    fn empty_filament_summary() {
        let mut arena = FilamentArena::new(Scale::new(20.0, 4.0).expect("scale"));
        let id = arena.create(Orientation::Vertical);
        let summary = arena.summary(id).expect("summary");
        assert_eq!(summary.to_string(), "F0 empty sections:0");
        let json = serde_json::to_value(&summary).expect("serializable");
        assert_eq!(json["orientation"], "vertical");
    }
}
