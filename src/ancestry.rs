//! Union-find over filament handles.
//!
//! Each filament records the filament that absorbed it (`parent`), which is
//! its lineage and never changes once set. A separate per-node hint caches the
//! last known representative so repeated lookups are near O(1). Hints are
//! refreshed on every lookup (path compression on read); they always point
//! somewhere along the lineage chain, so following `parent` from a hint still
//! reaches the current representative.
//!
//! There is no union by rank: the caller picks which filament survives.

use crate::filament::FilamentId;
use std::cell::Cell;

#[derive(Debug)]
struct Link {
    parent: Option<FilamentId>,
    hint: Cell<FilamentId>,
}

#[derive(Debug, Default)]
pub struct Ancestry {
    links: Vec<Link>,
}

impl Ancestry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new singleton and returns its handle.
    pub fn make_set(&mut self) -> FilamentId {
        let id = FilamentId(self.links.len() as u32);
        self.links.push(Link {
            parent: None,
            hint: Cell::new(id),
        });
        id
    }

    pub fn contains(&self, id: FilamentId) -> bool {
        id.index() < self.links.len()
    }

    /// Direct absorber of `id`, `None` for a representative.
    pub fn parent(&self, id: FilamentId) -> Option<FilamentId> {
        self.links[id.index()].parent
    }

    pub fn is_representative(&self, id: FilamentId) -> bool {
        self.parent(id).is_none()
    }

    /// Representative of the group holding `id`.
    pub fn find(&self, id: FilamentId) -> FilamentId {
        let mut root = self.links[id.index()].hint.get();
        while let Some(parent) = self.links[root.index()].parent {
            root = parent;
        }
        let mut node = id;
        while node != root {
            let link = &self.links[node.index()];
            let next = link.hint.get();
            link.hint.set(root);
            if next == node {
                match link.parent {
                    Some(parent) => node = parent,
                    None => break,
                }
            } else {
                node = next;
            }
        }
        root
    }

    /// Makes `absorbed` a child of `survivor`. Both must be representatives
    /// and distinct; the caller checks it.
    pub fn link(&mut self, survivor: FilamentId, absorbed: FilamentId) {
        debug_assert!(survivor != absorbed);
        debug_assert!(self.is_representative(survivor));
        debug_assert!(self.is_representative(absorbed));
        let link = &mut self.links[absorbed.index()];
        link.parent = Some(survivor);
        link.hint.set(survivor);
    }

    /// Lineage of `id`: itself, its parent, and so on up to its representative.
    pub fn lineage(&self, id: FilamentId) -> Vec<FilamentId> {
        let mut chain = vec![id];
        let mut node = id;
        while let Some(parent) = self.parent(node) {
            chain.push(parent);
            node = parent;
        }
        chain
    }
}
