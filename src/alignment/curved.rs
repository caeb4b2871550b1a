use super::line::straight_fit;
use super::{
    orthogonal_width, Alignment, AlignmentKind, Curve, Fit, NaturalSpline, Profile,
    ThicknessProfile,
};
use crate::scale::Scale;
use log::debug;

/// Minimum number of samples before switching from a line to a spline.
const MIN_SPLINE_SAMPLES: usize = 3;

/// Alignment following a slowly bending filament.
///
/// The covered span is cut into bins of `sampling_interline * interline`
/// coordinates. Each bin holding ink contributes one sample: ink-weighted mean
/// coordinate and position, plus the mean ink of its columns. Samples are
/// joined by a natural cubic spline. Ink is turned into a width across the
/// spline at each sample and interpolated linearly in between.
#[derive(Clone, Copy, Debug)]
pub struct CurvedAlignment {
    sampling_interline: f64,
}

impl CurvedAlignment {
    pub fn new(sampling_interline: f64) -> Self {
        Self { sampling_interline }
    }

    fn bin_length(&self, scale: &Scale) -> i32 {
        let len = scale.to_pixels(self.sampling_interline);
        if len.is_finite() {
            (len.round() as i32).max(1)
        } else {
            1
        }
    }
}

#[derive(Default)]
struct Bin {
    sum_w: f64,
    sum_coord: f64,
    sum_pos: f64,
    columns: usize,
}

impl Alignment for CurvedAlignment {
    fn kind(&self) -> AlignmentKind {
        AlignmentKind::Curved
    }

    fn fit(&self, profile: &Profile, scale: &Scale) -> Fit {
        let (first, last) = match (profile.first_coord(), profile.last_coord()) {
            (Some(f), Some(l)) => (f, l),
            _ => return straight_fit(profile),
        };
        let bin_len = self.bin_length(scale);
        let bin_of =
            |coord: i32| ((i64::from(coord) - i64::from(first)) / i64::from(bin_len)) as usize;
        let bin_count = bin_of(last) + 1;
        let mut bins: Vec<Bin> = (0..bin_count).map(|_| Bin::default()).collect();
        for col in profile.columns() {
            let bin = &mut bins[bin_of(col.coord)];
            bin.sum_w += col.ink;
            bin.sum_coord += col.ink * col.coord as f64;
            bin.sum_pos += col.ink * col.pos;
            bin.columns += 1;
        }

        let mut knots = Vec::with_capacity(bin_count);
        let mut thickness = Vec::with_capacity(bin_count);
        for bin in bins.iter().filter(|b| b.columns > 0 && b.sum_w > 0.0) {
            let coord = bin.sum_coord / bin.sum_w;
            knots.push((coord, bin.sum_pos / bin.sum_w));
            thickness.push((coord, bin.sum_w / bin.columns as f64));
        }

        if knots.len() < MIN_SPLINE_SAMPLES {
            debug!(
                "curved alignment: {} sample(s) over [{first}, {last}], using straight fit",
                knots.len()
            );
            return straight_fit(profile);
        }

        match NaturalSpline::new(&knots) {
            Some(spline) => {
                for (coord, width) in thickness.iter_mut() {
                    *width = orthogonal_width(*width, spline.derivative_at(*coord));
                }
                Fit {
                    curve: Curve::Spline(spline),
                    thickness: ThicknessProfile::new(thickness),
                }
            }
            None => straight_fit(profile),
        }
    }
}
