//! Sections: immutable runs of connected foreground pixels.
//!
//! A section is produced by upstream run-length analysis and is only read
//! here. Its runs are laid out along one axis: run `i` sits at coordinate
//! `first_coord + i` and covers the orthogonal interval
//! `[start, start + length)`. For near-horizontal structures (staff lines)
//! the runs are vertical, so the coordinate is `x` and the position is `y`.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::fmt;

/// Identifier of a section, assigned by the upstream extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub u32);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Dominant axis of a section or filament.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Runs are vertical, coordinate is `x`, position is `y`.
    #[default]
    Horizontal,
    /// Runs are horizontal, coordinate is `y`, position is `x`.
    Vertical,
}

impl Orientation {
    /// Maps a (coordinate, position) pair to an absolute `[x, y]` point.
    #[inline]
    pub fn absolute(self, coord: f64, pos: f64) -> [f64; 2] {
        match self {
            Orientation::Horizontal => [coord, pos],
            Orientation::Vertical => [pos, coord],
        }
    }
}

/// One contiguous run of foreground pixels, orthogonal to the section axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub start: i32,
    pub length: u32,
}

impl Run {
    pub fn new(start: i32, length: u32) -> Self {
        Self { start, length }
    }

    /// Continuous center of the run along the position axis.
    #[inline]
    pub fn center(&self) -> f64 {
        self.start as f64 + self.length as f64 * 0.5
    }

    /// First position past the run, saturated at `i32::MAX`.
    #[inline]
    pub fn end(&self) -> i32 {
        self.start.saturating_add_unsigned(self.length)
    }
}

/// Axis-aligned bounding box in absolute pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Immutable run-length section.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub orientation: Orientation,
    pub first_coord: i32,
    pub runs: Vec<Run>,
    #[serde(skip)]
    weight: OnceLock<u64>,
    #[serde(skip)]
    bounds: OnceLock<Option<Bounds>>,
}

impl Section {
    pub fn new(id: SectionId, orientation: Orientation, first_coord: i32, runs: Vec<Run>) -> Self {
        Self {
            id,
            orientation,
            first_coord,
            runs,
            weight: OnceLock::new(),
            bounds: OnceLock::new(),
        }
    }

    /// Coordinate of the last run (equal to `first_coord` for a one-run section).
    pub fn last_coord(&self) -> i32 {
        self.coord_of(self.runs.len().saturating_sub(1))
    }

    /// Coordinate of run `index`, saturated at `i32::MAX`.
    fn coord_of(&self, index: usize) -> i32 {
        let offset = i32::try_from(index).unwrap_or(i32::MAX);
        self.first_coord.saturating_add(offset)
    }

    /// Iterates `(coord, run)` pairs in coordinate order.
    pub fn runs_with_coord(&self) -> impl Iterator<Item = (i32, &Run)> + '_ {
        self.runs
            .iter()
            .enumerate()
            .map(move |(i, run)| (self.coord_of(i), run))
    }

    fn compute_weight(&self) -> u64 {
        self.runs.iter().map(|r| r.length as u64).sum()
    }

    /// Number of foreground pixels.
    pub fn weight(&self) -> u64 {
        *self.weight.get_or_init(|| self.compute_weight())
    }

    fn compute_bounds(&self) -> Option<Bounds> {
        let min_pos = self.runs.iter().map(|r| r.start).min()?;
        let max_pos = self.runs.iter().map(Run::end).max()?;
        let extent = i32::try_from(self.runs.len()).unwrap_or(i32::MAX);
        let bounds = match self.orientation {
            Orientation::Horizontal => Bounds {
                x: self.first_coord,
                y: min_pos,
                width: extent,
                height: max_pos.saturating_sub(min_pos),
            },
            Orientation::Vertical => Bounds {
                x: min_pos,
                y: self.first_coord,
                width: max_pos.saturating_sub(min_pos),
                height: extent,
            },
        };
        Some(bounds)
    }

    /// Bounding box, `None` for a section without runs.
    pub fn bounds(&self) -> Option<Bounds> {
        *self.bounds.get_or_init(|| self.compute_bounds())
    }

    /// Pixel-weighted centroid as an absolute `[x, y]` point.
    pub fn centroid(&self) -> Option<[f64; 2]> {
        let weight = self.weight();
        if weight == 0 {
            return None;
        }
        let mut sum_coord = 0.0;
        let mut sum_pos = 0.0;
        for (coord, run) in self.runs_with_coord() {
            let w = run.length as f64;
            sum_coord += w * coord as f64;
            sum_pos += w * run.center();
        }
        let w = weight as f64;
        Some(self.orientation.absolute(sum_coord / w, sum_pos / w))
    }
}
