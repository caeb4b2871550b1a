//! The filament entity: a growing set of sections and its fitted geometry.
//!
//! A filament is a candidate long line, possibly bent, assembled from many
//! short sections. Every geometric query goes through the filament's
//! [`Alignment`] strategy. The fit is computed lazily on first read and
//! dropped whenever the membership changes, together with the caller-managed
//! reference distance.
//!
//! Filaments live in a [`FilamentArena`](crate::arena::FilamentArena), which
//! also owns the ancestry links between them. The methods here act on one
//! filament in isolation and never look at ancestry.

use crate::alignment::{Alignment, AlignmentParams, Fit, Profile};
use crate::error::{FilamentError, Result};
use crate::scale::Scale;
use crate::section::{Orientation, Section, SectionId};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;

/// Stable handle of a filament inside its arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilamentId(pub u32);

impl FilamentId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FilamentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

/// Geometry derived from the current members.
#[derive(Debug)]
struct Fitted {
    fit: Fit,
    start_coord: i32,
    stop_coord: i32,
    mean_distance: f64,
}

#[derive(Debug)]
pub struct Filament {
    id: FilamentId,
    orientation: Orientation,
    scale: Scale,
    members: Vec<Arc<Section>>,
    weight: u64,
    alignment: Box<dyn Alignment>,
    fitted: OnceCell<Option<Fitted>>,
    ref_distance: Option<f64>,
}

impl Filament {
    pub fn new(id: FilamentId, orientation: Orientation, scale: Scale) -> Self {
        Self::with_alignment(id, orientation, scale, AlignmentParams::default().build())
    }

    pub fn with_alignment(
        id: FilamentId,
        orientation: Orientation,
        scale: Scale,
        alignment: Box<dyn Alignment>,
    ) -> Self {
        Self {
            id,
            orientation,
            scale,
            members: Vec::new(),
            weight: 0,
            alignment,
            fitted: OnceCell::new(),
            ref_distance: None,
        }
    }

    pub fn id(&self) -> FilamentId {
        self.id
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    pub fn alignment(&self) -> &dyn Alignment {
        self.alignment.as_ref()
    }

    /// Member sections in inclusion order.
    pub fn members(&self) -> &[Arc<Section>] {
        &self.members
    }

    pub fn member_ids(&self) -> impl Iterator<Item = SectionId> + '_ {
        self.members.iter().map(|s| s.id)
    }

    pub fn contains(&self, section: SectionId) -> bool {
        self.members.iter().any(|s| s.id == section)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Total foreground pixel count of the members.
    pub fn weight(&self) -> u64 {
        self.weight
    }

    /// Checks that `section` could be appended without changing anything.
    pub(crate) fn check_section(&self, section: &Section) -> Result<()> {
        if section.orientation != self.orientation {
            return Err(FilamentError::OrientationMismatch {
                filament: self.id,
                section: section.id,
                expected: self.orientation,
                found: section.orientation,
            });
        }
        if section.weight() == 0 {
            return Err(FilamentError::InklessSection {
                filament: self.id,
                section: section.id,
            });
        }
        if self.contains(section.id) {
            return Err(FilamentError::DuplicateMember {
                filament: self.id,
                section: section.id,
            });
        }
        Ok(())
    }

    /// Appends a section. A duplicate, mis-oriented or inkless section is
    /// rejected and leaves the filament untouched.
    pub fn add_section(&mut self, section: Arc<Section>) -> Result<()> {
        self.check_section(&section)?;
        self.weight += section.weight();
        self.members.push(section);
        self.invalidate();
        Ok(())
    }

    /// Drops the cached fit and the reference distance.
    pub(crate) fn invalidate(&mut self) {
        self.fitted.take();
        self.ref_distance = None;
    }

    fn compute_fitted(&self) -> Option<Fitted> {
        let profile = Profile::from_sections(self.members.iter().map(|s| &**s));
        let start_coord = profile.first_coord()?;
        let stop_coord = profile.last_coord()?;
        let fit = self.alignment.fit(&profile, &self.scale);
        let mean_distance = fit.mean_distance(&profile);
        Some(Fitted {
            fit,
            start_coord,
            stop_coord,
            mean_distance,
        })
    }

    fn fitted(&self) -> Result<&Fitted> {
        self.fitted
            .get_or_init(|| self.compute_fitted())
            .as_ref()
            .ok_or(FilamentError::Empty { filament: self.id })
    }

    /// Position (`y` for horizontal, `x` for vertical) at `coord`.
    pub fn position_at(&self, coord: f64) -> Result<f64> {
        Ok(self.fitted()?.fit.curve.position_at(coord))
    }

    /// Derivative of the position with respect to the coordinate.
    pub fn slope_at(&self, coord: f64) -> Result<f64> {
        Ok(self.fitted()?.fit.curve.slope_at(coord))
    }

    pub fn thickness_at(&self, coord: f64) -> Result<f64> {
        Ok(self.fitted()?.fit.thickness.at(coord))
    }

    /// Estimated thickness at `coord` of the line obtained by merging `self`
    /// and `that`: the gap between both centerlines plus their mean thickness.
    ///
    /// Values close to the sheet's main foreground thickness denote fragments
    /// of the same physical line; large values denote unrelated filaments.
    pub fn resulting_thickness_at(&self, that: &Filament, coord: f64) -> Result<f64> {
        let this_pos = self.position_at(coord)?;
        let that_pos = that.position_at(coord)?;
        let this_thickness = self.thickness_at(coord)?;
        let that_thickness = that.thickness_at(coord)?;
        Ok((this_pos - that_pos).abs() + (this_thickness + that_thickness) / 2.0)
    }

    /// How much of the filament is actually filled with ink, in pixels along
    /// its axis.
    pub fn true_length(&self) -> i64 {
        (self.weight as f64 / self.scale.main_fore).round() as i64
    }

    /// First covered coordinate.
    pub fn start_coord(&self) -> Result<i32> {
        Ok(self.fitted()?.start_coord)
    }

    /// Last covered coordinate.
    pub fn stop_coord(&self) -> Result<i32> {
        Ok(self.fitted()?.stop_coord)
    }

    /// Absolute `[x, y]` point of the fitted line at its first coordinate.
    pub fn start_point(&self) -> Result<[f64; 2]> {
        let fitted = self.fitted()?;
        let coord = fitted.start_coord as f64;
        Ok(self
            .orientation
            .absolute(coord, fitted.fit.curve.position_at(coord)))
    }

    /// Absolute `[x, y]` point of the fitted line at its last coordinate.
    pub fn stop_point(&self) -> Result<[f64; 2]> {
        let fitted = self.fitted()?;
        let coord = fitted.stop_coord as f64;
        Ok(self
            .orientation
            .absolute(coord, fitted.fit.curve.position_at(coord)))
    }

    /// Mean distance between the member columns and the fitted line.
    pub fn mean_distance(&self) -> Result<f64> {
        Ok(self.fitted()?.mean_distance)
    }

    pub fn set_ref_distance(&mut self, distance: f64) -> Result<()> {
        if !distance.is_finite() {
            return Err(FilamentError::InvalidRefDistance {
                filament: self.id,
                distance,
            });
        }
        self.ref_distance = Some(distance);
        Ok(())
    }

    /// Distance from the reference axis, unset after any membership change.
    pub fn ref_distance(&self) -> Option<f64> {
        self.ref_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::Run;

    fn scale() -> Scale {
        Scale::new(20.0, 4.0).expect("valid scale")
    }

    fn flat(id: u32, first: i32, len: usize, start: i32) -> Arc<Section> {
        Arc::new(Section::new(
            SectionId(id),
            Orientation::Horizontal,
            first,
            vec![Run::new(start, 4); len],
        ))
    }

    #[test]
    fn rejects_duplicate_member_without_side_effects() {
        let mut fil = Filament::new(FilamentId(0), Orientation::Horizontal, scale());
        fil.add_section(flat(1, 0, 10, 48)).expect("first add");
        fil.set_ref_distance(12.0).expect("finite");
        let err = fil.add_section(flat(1, 0, 10, 48)).unwrap_err();
        assert_eq!(
            err,
            FilamentError::DuplicateMember {
                filament: FilamentId(0),
                section: SectionId(1),
            }
        );
        assert_eq!(fil.members().len(), 1);
        assert_eq!(fil.ref_distance(), Some(12.0));
        assert_eq!(fil.weight(), 40);
    }

    #[test]
    fn rejects_mis_oriented_section() {
        let mut fil = Filament::new(FilamentId(2), Orientation::Vertical, scale());
        assert!(matches!(
            fil.add_section(flat(1, 0, 3, 0)),
            Err(FilamentError::OrientationMismatch { .. })
        ));
        assert!(fil.is_empty());
    }

    #[test]
    fn empty_filament_reports_precondition_error() {
        let fil = Filament::new(FilamentId(5), Orientation::Horizontal, scale());
        assert_eq!(
            fil.position_at(0.0),
            Err(FilamentError::Empty {
                filament: FilamentId(5)
            })
        );
        assert!(fil.start_point().is_err());
        assert_eq!(fil.true_length(), 0);
    }

    #[test]
    fn geometry_follows_membership_changes() {
        let mut fil = Filament::new(FilamentId(0), Orientation::Horizontal, scale());
        fil.add_section(flat(1, 0, 30, 48)).expect("add");
        assert_eq!(fil.stop_coord(), Ok(29));
        assert!((fil.position_at(10.0).expect("fit") - 50.0).abs() < 1e-9);
        fil.add_section(flat(2, 30, 30, 48)).expect("add");
        assert_eq!(fil.stop_coord(), Ok(59));
        let stop = fil.stop_point().expect("stop point");
        assert!((stop[0] - 59.0).abs() < 1e-9 && (stop[1] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn ref_distance_is_cleared_by_add() {
        let mut fil = Filament::new(FilamentId(0), Orientation::Horizontal, scale());
        fil.add_section(flat(1, 0, 10, 48)).expect("add");
        fil.set_ref_distance(-3.5).expect("finite");
        assert_eq!(fil.ref_distance(), Some(-3.5));
        fil.add_section(flat(2, 10, 10, 48)).expect("add");
        assert_eq!(fil.ref_distance(), None);
    }

    #[test]
    fn rejects_section_without_ink() {
        let mut fil = Filament::new(FilamentId(1), Orientation::Horizontal, scale());
        let inkless = Arc::new(Section::new(
            SectionId(4),
            Orientation::Horizontal,
            0,
            vec![Run::new(48, 0); 10],
        ));
        assert_eq!(
            fil.add_section(inkless),
            Err(FilamentError::InklessSection {
                filament: FilamentId(1),
                section: SectionId(4),
            })
        );
        assert!(fil.is_empty());

        // Zero-length runs inside an inked section only leave holes.
        let mut runs = vec![Run::new(48, 4); 10];
        runs[3] = Run::new(48, 0);
        fil.add_section(Arc::new(Section::new(
            SectionId(5),
            Orientation::Horizontal,
            0,
            runs,
        )))
        .expect("inked section");
        assert_eq!(fil.start_coord(), Ok(0));
        assert!((fil.position_at(3.0).expect("fit") - 50.0).abs() < 1e-9);
    }

    #[test]
    fn non_finite_ref_distance_is_rejected() {
        let mut fil = Filament::new(FilamentId(3), Orientation::Horizontal, scale());
        fil.add_section(flat(1, 0, 10, 48)).expect("add");
        fil.set_ref_distance(2.0).expect("finite");
        assert!(matches!(
            fil.set_ref_distance(f64::NAN),
            Err(FilamentError::InvalidRefDistance { .. })
        ));
        assert!(fil.set_ref_distance(f64::INFINITY).is_err());
        assert_eq!(fil.ref_distance(), Some(2.0));
    }

    #[test]
    fn true_length_rounds_weight_over_main_fore() {
        let mut fil = Filament::new(FilamentId(0), Orientation::Horizontal, scale());
        // 25 runs of 4 px plus one run of 2 px: 102 / 4 = 25.5 -> 26.
        fil.add_section(flat(1, 0, 25, 48)).expect("add");
        fil.add_section(Arc::new(Section::new(
            SectionId(2),
            Orientation::Horizontal,
            25,
            vec![Run::new(49, 2)],
        )))
        .expect("add");
        assert_eq!(fil.true_length(), 26);
    }
}
