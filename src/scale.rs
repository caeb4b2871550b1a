//! Sheet-wide calibration consumed by the filament stage.

use crate::error::{FilamentError, Result};
use serde::{Deserialize, Serialize};

/// Interline distance and dominant foreground run thickness, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub interline: f64,
    pub main_fore: f64,
}

impl Scale {
    pub fn new(interline: f64, main_fore: f64) -> Result<Self> {
        let scale = Self {
            interline,
            main_fore,
        };
        scale.validate()?;
        Ok(scale)
    }

    /// Both values must be finite and strictly positive.
    pub fn validate(&self) -> Result<()> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.interline) && ok(self.main_fore) {
            Ok(())
        } else {
            Err(FilamentError::InvalidScale {
                interline: self.interline,
                main_fore: self.main_fore,
            })
        }
    }

    /// Converts a length expressed in interlines to pixels.
    #[inline]
    pub fn to_pixels(&self, interlines: f64) -> f64 {
        interlines * self.interline
    }
}
