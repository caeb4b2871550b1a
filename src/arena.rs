//! Arena owning the filaments of one sheet and their ancestry.
//!
//! Filaments are addressed by [`FilamentId`] and never removed: an absorbed
//! filament stays in the arena for traceability but every query issued
//! through [`FilamentArena::get`] is redirected to its representative.

use crate::alignment::{Alignment, AlignmentParams};
use crate::ancestry::Ancestry;
use crate::error::{FilamentError, Result};
use crate::filament::{Filament, FilamentId};
use crate::report::FilamentSummary;
use crate::scale::Scale;
use crate::section::{Orientation, Section};
use log::debug;
use std::sync::Arc;

#[derive(Debug)]
pub struct FilamentArena {
    scale: Scale,
    alignment: AlignmentParams,
    filaments: Vec<Filament>,
    ancestry: Ancestry,
}

impl FilamentArena {
    pub fn new(scale: Scale) -> Self {
        Self::with_alignment(scale, AlignmentParams::default())
    }

    pub fn with_alignment(scale: Scale, alignment: AlignmentParams) -> Self {
        Self {
            scale,
            alignment,
            filaments: Vec::new(),
            ancestry: Ancestry::new(),
        }
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    /// Total number of filaments ever created, absorbed ones included.
    pub fn len(&self) -> usize {
        self.filaments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filaments.is_empty()
    }

    /// Creates an empty filament using the arena's default alignment.
    pub fn create(&mut self, orientation: Orientation) -> FilamentId {
        let alignment = self.alignment.build();
        self.create_with_alignment(orientation, alignment)
    }

    pub fn create_with_alignment(
        &mut self,
        orientation: Orientation,
        alignment: Box<dyn Alignment>,
    ) -> FilamentId {
        let id = self.ancestry.make_set();
        self.filaments
            .push(Filament::with_alignment(id, orientation, self.scale, alignment));
        id
    }

    /// Creates a filament holding `section`, oriented like it.
    pub fn seed(&mut self, section: Arc<Section>) -> Result<FilamentId> {
        let id = self.create(section.orientation);
        self.filaments[id.index()].add_section(section)?;
        Ok(id)
    }

    fn check(&self, id: FilamentId) -> Result<()> {
        if self.ancestry.contains(id) {
            Ok(())
        } else {
            Err(FilamentError::UnknownFilament(id))
        }
    }

    fn check_alive(&self, id: FilamentId) -> Result<()> {
        self.check(id)?;
        let ancestor = self.ancestry.find(id);
        if ancestor == id {
            Ok(())
        } else {
            Err(FilamentError::Absorbed {
                filament: id,
                ancestor,
            })
        }
    }

    /// Living representative of `id` (itself when never absorbed).
    pub fn ancestor(&self, id: FilamentId) -> Result<FilamentId> {
        self.check(id)?;
        Ok(self.ancestry.find(id))
    }

    /// Filament that directly absorbed `id`, if any.
    pub fn parent(&self, id: FilamentId) -> Result<Option<FilamentId>> {
        self.check(id)?;
        Ok(self.ancestry.parent(id))
    }

    pub fn is_representative(&self, id: FilamentId) -> bool {
        self.ancestry.contains(id) && self.ancestry.is_representative(id)
    }

    /// Chain of absorptions from `id` up to its representative.
    pub fn lineage(&self, id: FilamentId) -> Result<Vec<FilamentId>> {
        self.check(id)?;
        Ok(self.ancestry.lineage(id))
    }

    /// Representative filament of `id`.
    pub fn get(&self, id: FilamentId) -> Result<&Filament> {
        let ancestor = self.ancestor(id)?;
        Ok(&self.filaments[ancestor.index()])
    }

    /// The filament stored under `id`, even when it has been absorbed.
    pub fn own(&self, id: FilamentId) -> Result<&Filament> {
        self.check(id)?;
        Ok(&self.filaments[id.index()])
    }

    fn alive_mut(&mut self, id: FilamentId) -> Result<&mut Filament> {
        self.check_alive(id)?;
        Ok(&mut self.filaments[id.index()])
    }

    /// Living filaments in creation order.
    pub fn representatives(&self) -> impl Iterator<Item = &Filament> + '_ {
        self.filaments
            .iter()
            .filter(|f| self.ancestry.is_representative(f.id()))
    }

    pub fn representative_ids(&self) -> Vec<FilamentId> {
        self.representatives().map(Filament::id).collect()
    }

    /// Appends `section` to the living filament `id`.
    pub fn add_section(&mut self, id: FilamentId, section: Arc<Section>) -> Result<()> {
        self.alive_mut(id)?.add_section(section)
    }

    /// Absorbs `absorbed` into `target`.
    ///
    /// Every member of `absorbed` is appended to `target` and `target`
    /// becomes its parent. Both must be distinct living filaments. The call
    /// is atomic: when any member would be rejected nothing changes.
    pub fn include(&mut self, target: FilamentId, absorbed: FilamentId) -> Result<()> {
        self.check(target)?;
        self.check(absorbed)?;
        if self.ancestry.find(target) == self.ancestry.find(absorbed) {
            return Err(FilamentError::SelfInclude { filament: target });
        }
        self.check_alive(target)?;
        self.check_alive(absorbed)?;

        let sections: Vec<Arc<Section>> = self.filaments[absorbed.index()].members().to_vec();
        {
            let receiver = &self.filaments[target.index()];
            for section in &sections {
                receiver.check_section(section)?;
            }
        }
        let receiver = &mut self.filaments[target.index()];
        for section in sections {
            receiver.add_section(section)?;
        }
        receiver.invalidate();
        self.ancestry.link(target, absorbed);
        let merged = &self.filaments[target.index()];
        debug!(
            "filament {target} absorbed {absorbed} ({} members, weight {})",
            merged.members().len(),
            merged.weight()
        );
        Ok(())
    }

    /// Merge metric between the representatives of `a` and `b` at `coord`.
    pub fn resulting_thickness_at(&self, a: FilamentId, b: FilamentId, coord: f64) -> Result<f64> {
        self.get(a)?.resulting_thickness_at(self.get(b)?, coord)
    }

    /// Sets the reference distance of the representative of `id`.
    pub fn set_ref_distance(&mut self, id: FilamentId, distance: f64) -> Result<()> {
        let ancestor = self.ancestor(id)?;
        self.filaments[ancestor.index()].set_ref_distance(distance)
    }

    /// Human-readable summary of `id` as stored, with its ancestry.
    pub fn summary(&self, id: FilamentId) -> Result<FilamentSummary> {
        let own = self.own(id)?;
        let ancestor = self.ancestor(id)?;
        Ok(FilamentSummary::from_filament(
            own,
            (ancestor != id).then_some(ancestor),
        ))
    }
}
