#![doc = include_str!("../README.md")]

// Core model
pub mod alignment;
pub mod ancestry;
pub mod arena;
pub mod error;
pub mod filament;
pub mod ordering;
pub mod scale;
pub mod section;

// Filament building and reporting on top of the core.
pub mod config;
pub mod factory;
pub mod io;
pub mod report;

// --- High-level re-exports -------------------------------------------------

pub use crate::arena::FilamentArena;
pub use crate::error::{FilamentError, Result};
pub use crate::filament::{Filament, FilamentId};
pub use crate::scale::Scale;
pub use crate::section::{Orientation, Run, Section, SectionId};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use staff_filaments::prelude::*;
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), FilamentError> {
/// let scale = Scale::new(20.0, 4.0)?;
/// let mut arena = FilamentArena::new(scale);
/// let runs = vec![Run::new(48, 4); 100];
/// let section = Section::new(SectionId(0), Orientation::Horizontal, 0, runs);
/// let id = arena.seed(Arc::new(section))?;
///
/// let line = arena.get(id)?;
/// assert!((line.position_at(50.0)? - 50.0).abs() < 1e-6);
/// assert_eq!(line.true_length(), 100);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::factory::{FactoryParams, FilamentFactory};
    pub use crate::{
        FilamentArena, FilamentError, FilamentId, Orientation, Run, Scale, Section, SectionId,
    };
}
