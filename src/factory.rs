//! Builds filaments out of a sheet's sections.
//!
//! Every section of the requested orientation seeds its own filament. The
//! factory then repeatedly scans living filaments ordered by start and
//! merges neighbours whose junction looks like a single line:
//!
//! - the coordinate gap between them is at most `max_gap_interline`,
//! - they overlap by at most `max_overlap_interline`,
//! - [`Filament::resulting_thickness_at`] at the junction does not exceed
//!   `max_merge_thickness_ratio * main_fore`.
//!
//! The heavier filament absorbs the lighter one. Scanning stops when a pass
//! merges nothing or after `max_passes`. Surviving filaments whose
//! [`Filament::true_length`] is below `min_true_length_interline` are
//! reported as discarded.
//!
//! Sheets are independent: [`process_sheets`] handles them in parallel when
//! the `parallel` feature is enabled.

use crate::alignment::AlignmentParams;
use crate::arena::FilamentArena;
use crate::error::Result;
use crate::filament::{Filament, FilamentId};
use crate::ordering::sort_by_start;
use crate::report::{FilamentSummary, SheetReport};
use crate::scale::Scale;
use crate::section::{Orientation, Section};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Tunable parameters of the filament factory, lengths in interlines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryParams {
    /// Orientation of the filaments to build.
    pub orientation: Orientation,
    pub alignment: AlignmentParams,
    /// Maximum coordinate gap between two merged filaments.
    pub max_gap_interline: f64,
    /// Maximum coordinate overlap between two merged filaments.
    pub max_overlap_interline: f64,
    /// Merge acceptance: resulting thickness relative to `main_fore`.
    pub max_merge_thickness_ratio: f64,
    /// Minimum filled length for a filament to be kept.
    pub min_true_length_interline: f64,
    pub max_passes: usize,
}

impl Default for FactoryParams {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            alignment: AlignmentParams::default(),
            max_gap_interline: 1.0,
            max_overlap_interline: 0.5,
            max_merge_thickness_ratio: 1.5,
            min_true_length_interline: 2.0,
            max_passes: 4,
        }
    }
}

/// Sections and calibration of one sheet.
#[derive(Clone, Debug, Deserialize)]
pub struct SheetInput {
    pub scale: Scale,
    pub sections: Vec<Section>,
}

/// Arena produced for one sheet with the factory's verdict.
#[derive(Debug)]
pub struct FactoryOutcome {
    pub arena: FilamentArena,
    /// Long enough representatives, ordered by start.
    pub kept: Vec<FilamentId>,
    pub discarded: Vec<FilamentId>,
    pub sections: usize,
    pub merges: usize,
    pub elapsed_ms: f64,
}

impl FactoryOutcome {
    pub fn report(&self, sheet: usize) -> Result<SheetReport> {
        let kept = self
            .kept
            .iter()
            .map(|&id| self.arena.summary(id))
            .collect::<Result<Vec<FilamentSummary>>>()?;
        Ok(SheetReport {
            sheet,
            sections: self.sections,
            filaments_created: self.arena.len(),
            merges: self.merges,
            kept,
            discarded: self.discarded.clone(),
            elapsed_ms: self.elapsed_ms,
        })
    }
}

enum Verdict {
    /// The candidate starts too far away; later candidates are even farther.
    OutOfReach,
    Reject,
    Accept,
}

#[derive(Clone, Debug, Default)]
pub struct FilamentFactory {
    params: FactoryParams,
}

impl FilamentFactory {
    pub fn new(params: FactoryParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FactoryParams {
        &self.params
    }

    pub fn build(&self, scale: Scale, sections: Vec<Section>) -> Result<FactoryOutcome> {
        let t0 = Instant::now();
        scale.validate()?;
        let mut arena = FilamentArena::with_alignment(scale, self.params.alignment.clone());

        let total = sections.len();
        let mut seeds: Vec<Arc<Section>> = sections
            .into_iter()
            .filter(|s| s.orientation == self.params.orientation && s.weight() > 0)
            .map(Arc::new)
            .collect();
        if seeds.len() < total {
            debug!(
                "factory: ignoring {} section(s) not {:?} or empty",
                total - seeds.len(),
                self.params.orientation
            );
        }
        seeds.sort_by_key(|s| s.first_coord);
        for section in seeds {
            arena.seed(section)?;
        }

        let mut merges = 0;
        for pass in 0..self.params.max_passes {
            let merged = self.merge_pass(&mut arena)?;
            debug!("factory: pass {pass} merged {merged} filament(s)");
            merges += merged;
            if merged == 0 {
                break;
            }
        }

        let mut ids = arena.representative_ids();
        sort_by_start(&arena, &mut ids)?;
        let min_length = scale.to_pixels(self.params.min_true_length_interline);
        let (kept, discarded): (Vec<FilamentId>, Vec<FilamentId>) =
            ids.into_iter().partition(|&id| {
                arena
                    .get(id)
                    .map(|f| f.true_length() as f64 >= min_length)
                    .unwrap_or(false)
            });

        Ok(FactoryOutcome {
            arena,
            kept,
            discarded,
            sections: total,
            merges,
            elapsed_ms: t0.elapsed().as_secs_f64() * 1000.0,
        })
    }

    fn merge_pass(&self, arena: &mut FilamentArena) -> Result<usize> {
        let mut ids = arena.representative_ids();
        sort_by_start(arena, &mut ids)?;
        let mut merged = 0;
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                let (a, b) = (ids[i], ids[j]);
                if !arena.is_representative(a) {
                    break;
                }
                if !arena.is_representative(b) {
                    continue;
                }
                let verdict = self.evaluate(arena.get(a)?, arena.get(b)?)?;
                match verdict {
                    Verdict::OutOfReach => break,
                    Verdict::Reject => continue,
                    Verdict::Accept => {
                        let (survivor, absorbed) =
                            if arena.get(b)?.weight() > arena.get(a)?.weight() {
                                (b, a)
                            } else {
                                (a, b)
                            };
                        arena.include(survivor, absorbed)?;
                        merged += 1;
                    }
                }
            }
        }
        Ok(merged)
    }

    /// `a` is expected to start no later than `b`.
    fn evaluate(&self, a: &Filament, b: &Filament) -> Result<Verdict> {
        let scale = a.scale();
        let (a_start, a_stop) = (a.start_coord()?, a.stop_coord()?);
        let (b_start, b_stop) = (b.start_coord()?, b.stop_coord()?);

        let gap = (b_start - a_stop) as f64;
        if gap > scale.to_pixels(self.params.max_gap_interline) {
            return Ok(Verdict::OutOfReach);
        }
        let overlap = (a_stop.min(b_stop) - a_start.max(b_start)) as f64;
        if overlap > scale.to_pixels(self.params.max_overlap_interline) {
            return Ok(Verdict::Reject);
        }

        let junction = if gap >= 0.0 {
            (a_stop + b_start) as f64 / 2.0
        } else {
            (a_start.max(b_start) + a_stop.min(b_stop)) as f64 / 2.0
        };
        let thickness = a.resulting_thickness_at(b, junction)?;
        let limit = self.params.max_merge_thickness_ratio * scale.main_fore;
        trace!(
            "factory: {} vs {} at {junction:.1}: thickness {thickness:.2} (limit {limit:.2})",
            a.id(),
            b.id()
        );
        if thickness <= limit {
            Ok(Verdict::Accept)
        } else {
            Ok(Verdict::Reject)
        }
    }
}

/// Runs the factory on every sheet, in parallel with the `parallel` feature.
pub fn process_sheets(
    sheets: Vec<SheetInput>,
    params: &FactoryParams,
) -> Vec<Result<FactoryOutcome>> {
    let factory = FilamentFactory::new(params.clone());

    #[cfg(feature = "parallel")]
    let sheets = sheets.into_par_iter();
    #[cfg(not(feature = "parallel"))]
    let sheets = sheets.into_iter();

    sheets
        .map(|sheet| factory.build(sheet.scale, sheet.sections))
        .collect()
}
