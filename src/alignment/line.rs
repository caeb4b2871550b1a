//! Weighted least-squares line fitting.

use super::{orthogonal_width, Alignment, AlignmentKind, Curve, Fit, Profile, ThicknessProfile};
use crate::scale::Scale;
use nalgebra::{Matrix2, Vector2};

const EPS: f64 = 1e-9;

/// Straight line `pos = intercept + slope * (coord - origin)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub origin: f64,
    pub intercept: f64,
    pub slope: f64,
}

impl Line {
    #[inline]
    pub fn position_at(&self, coord: f64) -> f64 {
        self.intercept + self.slope * (coord - self.origin)
    }
}

/// Fits `pos` against `coord` over `(coord, pos, weight)` samples.
///
/// Coordinates are centered on their weighted mean before solving the normal
/// equations. When all samples share one coordinate the slope is zero and the
/// line passes through the weighted mean position. Returns `None` when the
/// total weight vanishes.
pub fn fit_line<I>(samples: I) -> Option<Line>
where
    I: IntoIterator<Item = (f64, f64, f64)> + Clone,
{
    let mut sum_w = 0.0;
    let mut sum_c = 0.0;
    for (c, _, w) in samples.clone() {
        sum_w += w;
        sum_c += w * c;
    }
    if sum_w <= EPS {
        return None;
    }
    let origin = sum_c / sum_w;

    let mut a12 = 0.0;
    let mut a22 = 0.0;
    let mut b1 = 0.0;
    let mut b2 = 0.0;
    for (c, p, w) in samples {
        let dc = c - origin;
        a12 += w * dc;
        a22 += w * dc * dc;
        b1 += w * p;
        b2 += w * dc * p;
    }

    let normal = Matrix2::new(sum_w, a12, a12, a22);
    let rhs = Vector2::new(b1, b2);
    let (intercept, slope) = if a22 <= EPS {
        (b1 / sum_w, 0.0)
    } else {
        match normal.lu().solve(&rhs) {
            Some(sol) => (sol[0], sol[1]),
            None => (b1 / sum_w, 0.0),
        }
    };

    Some(Line {
        origin,
        intercept,
        slope,
    })
}

/// Fits one straight line through the ink-weighted column centers.
pub(crate) fn straight_fit(profile: &Profile) -> Fit {
    let columns = profile.columns();
    let samples = columns.iter().map(|c| (c.coord as f64, c.pos, c.ink));
    let curve = match fit_line(samples) {
        Some(line) if columns.len() > 1 => Curve::Line(line),
        Some(line) => Curve::Point {
            pos: line.intercept,
        },
        None => Curve::Point { pos: 0.0 },
    };
    let thickness = orthogonal_width(profile.mean_ink(), curve.slope_at(0.0));
    Fit {
        curve,
        thickness: ThicknessProfile::constant(thickness),
    }
}

/// Alignment that keeps the filament straight.
#[derive(Clone, Copy, Debug, Default)]
pub struct StraightAlignment;

impl Alignment for StraightAlignment {
    fn kind(&self) -> AlignmentKind {
        AlignmentKind::Straight
    }

    fn fit(&self, profile: &Profile, _scale: &Scale) -> Fit {
        straight_fit(profile)
    }
}
