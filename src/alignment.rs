//! Alignment models: continuous position, slope and thickness of a filament.
//!
//! A filament delegates every geometric query to an [`Alignment`] strategy.
//! The strategy turns the member runs, aggregated into a [`Profile`] of
//! per-coordinate columns, into a [`Fit`]:
//!
//! - a [`Curve`] giving the position (and its derivative, the slope) as a
//!   function of the scanning coordinate (`x` for horizontal filaments, `y`
//!   for vertical ones),
//! - a [`ThicknessProfile`] giving the local cross-section width.
//!
//! Two strategies are provided:
//! - [`StraightAlignment`]: a single ink-weighted least-squares line.
//! - [`CurvedAlignment`]: the span is sampled every `sampling_interline`
//!   interlines and a natural cubic spline is passed through the samples, so
//!   the slope varies smoothly along slightly warped staff lines.
//!
//! Degenerate inputs never fail: too few samples fall back to the straight
//! line, a single column becomes a flat point. Outside the fitted span the
//! position is extrapolated linearly with the end slope.

mod curved;
mod line;
mod profile;
mod spline;

pub use curved::CurvedAlignment;
pub use line::{fit_line, Line, StraightAlignment};
pub use profile::{Column, Profile};
pub use spline::NaturalSpline;

use crate::scale::Scale;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strategy computing a [`Fit`] out of a filament profile.
pub trait Alignment: fmt::Debug + Send {
    fn kind(&self) -> AlignmentKind;

    /// Fits the profile. `profile` is expected to be non-empty.
    fn fit(&self, profile: &Profile, scale: &Scale) -> Fit;
}

/// Selects the alignment strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentKind {
    Straight,
    #[default]
    Curved,
}

/// Parameters used to build the alignment of new filaments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentParams {
    pub kind: AlignmentKind,
    /// Sampling bin length along the filament, in interlines (curved only).
    pub sampling_interline: f64,
}

impl Default for AlignmentParams {
    fn default() -> Self {
        Self {
            kind: AlignmentKind::Curved,
            sampling_interline: 1.0,
        }
    }
}

impl AlignmentParams {
    pub fn build(&self) -> Box<dyn Alignment> {
        match self.kind {
            AlignmentKind::Straight => Box::new(StraightAlignment),
            AlignmentKind::Curved => Box::new(CurvedAlignment::new(self.sampling_interline)),
        }
    }
}

/// Fitted centerline.
#[derive(Clone, Debug)]
pub enum Curve {
    /// Single column: flat line at the given position.
    Point { pos: f64 },
    Line(Line),
    Spline(NaturalSpline),
}

impl Curve {
    pub fn position_at(&self, coord: f64) -> f64 {
        match self {
            Curve::Point { pos } => *pos,
            Curve::Line(line) => line.position_at(coord),
            Curve::Spline(spline) => spline.value_at(coord),
        }
    }

    pub fn slope_at(&self, coord: f64) -> f64 {
        match self {
            Curve::Point { .. } => 0.0,
            Curve::Line(line) => line.slope,
            Curve::Spline(spline) => spline.derivative_at(coord),
        }
    }
}

/// Width across a curve of local `slope` for ink measured along the
/// position axis.
#[inline]
pub(crate) fn orthogonal_width(ink: f64, slope: f64) -> f64 {
    ink / (1.0 + slope * slope).sqrt()
}

/// Piecewise-linear thickness along the filament, held constant past its ends.
#[derive(Clone, Debug)]
pub struct ThicknessProfile {
    knots: Vec<(f64, f64)>,
}

impl ThicknessProfile {
    /// `knots` must be sorted by coordinate.
    pub fn new(knots: Vec<(f64, f64)>) -> Self {
        debug_assert!(knots.windows(2).all(|w| w[0].0 <= w[1].0));
        Self { knots }
    }

    pub fn constant(thickness: f64) -> Self {
        Self {
            knots: vec![(0.0, thickness)],
        }
    }

    pub fn at(&self, coord: f64) -> f64 {
        let (first, last) = match (self.knots.first(), self.knots.last()) {
            (Some(f), Some(l)) => (*f, *l),
            _ => return 0.0,
        };
        if coord <= first.0 {
            return first.1;
        }
        if coord >= last.0 {
            return last.1;
        }
        let idx = self.knots.partition_point(|k| k.0 <= coord);
        let (x0, t0) = self.knots[idx - 1];
        let (x1, t1) = self.knots[idx];
        let h = x1 - x0;
        if h <= f64::EPSILON {
            return t1;
        }
        t0 + (t1 - t0) * (coord - x0) / h
    }
}

/// Output of an alignment strategy.
#[derive(Clone, Debug)]
pub struct Fit {
    pub curve: Curve,
    pub thickness: ThicknessProfile,
}

impl Fit {
    /// Mean absolute distance between column centers and the curve.
    pub fn mean_distance(&self, profile: &Profile) -> f64 {
        let columns = profile.columns();
        if columns.is_empty() {
            return 0.0;
        }
        let sum: f64 = columns
            .iter()
            .map(|c| (c.pos - self.curve.position_at(c.coord as f64)).abs())
            .sum();
        sum / columns.len() as f64
    }
}
