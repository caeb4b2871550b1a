//! Error kinds raised by the filament core.
//!
//! Only structural violations and broken preconditions are errors. A merge
//! that merely looks bad is reported through the metric and left to the
//! caller.

use crate::filament::FilamentId;
use crate::section::{Orientation, SectionId};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum FilamentError {
    /// The section is already a member of the filament.
    #[error("section {section} is already a member of filament {filament}")]
    DuplicateMember {
        filament: FilamentId,
        section: SectionId,
    },

    /// A filament was asked to include itself (directly or through ancestry).
    #[error("filament {filament} cannot include itself")]
    SelfInclude { filament: FilamentId },

    /// The filament has been absorbed and can no longer be mutated directly.
    #[error("filament {filament} was absorbed by {ancestor}")]
    Absorbed {
        filament: FilamentId,
        ancestor: FilamentId,
    },

    /// Geometry was requested on a filament without any member.
    #[error("filament {filament} has no member section")]
    Empty { filament: FilamentId },

    /// Distance ordering requires every filament to carry a reference distance.
    #[error("filament {filament} has no reference distance")]
    RefDistanceUnset { filament: FilamentId },

    /// The section carries no foreground pixel, so it has no position.
    #[error("section {section} has no ink and cannot join filament {filament}")]
    InklessSection {
        filament: FilamentId,
        section: SectionId,
    },

    /// Reference distances must be finite to be ordered.
    #[error("filament {filament} got a non-finite reference distance {distance}")]
    InvalidRefDistance { filament: FilamentId, distance: f64 },

    #[error("section {section} is {found:?} but filament {filament} is {expected:?}")]
    OrientationMismatch {
        filament: FilamentId,
        section: SectionId,
        expected: Orientation,
        found: Orientation,
    },

    #[error("unknown filament {0}")]
    UnknownFilament(FilamentId),

    #[error("invalid scale (interline={interline}, main_fore={main_fore})")]
    InvalidScale { interline: f64, main_fore: f64 },
}

pub type Result<T> = std::result::Result<T, FilamentError>;
