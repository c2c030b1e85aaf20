//! Per-function resolution cache keyed by the argument type tuple.
//!
//! Resolution depends only on type names, the dispatch table and the catalog,
//! so a cached entry stays valid until the catalog changes. Every entry set is
//! stamped with the catalog generation it was computed under; a lookup under a
//! newer generation drops the whole map first.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::resolver::Resolution;

#[derive(Debug, Default)]
pub(crate) struct ResolutionCache {
    enabled: bool,
    generation: Cell<u64>,
    entries: RefCell<HashMap<Vec<String>, Rc<Resolution>>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl ResolutionCache {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn sync(&self, generation: u64) {
        if self.generation.get() != generation {
            let mut entries = self.entries.borrow_mut();
            if !entries.is_empty() {
                tracing::trace!(
                    stale = entries.len(),
                    generation,
                    "catalog changed, dropping cached resolutions"
                );
                entries.clear();
            }
            self.generation.set(generation);
        }
    }

    pub(crate) fn get(&self, key: &[String], generation: u64) -> Option<Rc<Resolution>> {
        if !self.enabled {
            return None;
        }
        self.sync(generation);
        let found = self.entries.borrow().get(key).cloned();
        match found {
            Some(_) => self.hits.set(self.hits.get() + 1),
            None => self.misses.set(self.misses.get() + 1),
        }
        found
    }

    pub(crate) fn insert(&self, key: Vec<String>, resolution: Rc<Resolution>, generation: u64) {
        if !self.enabled {
            return;
        }
        self.sync(generation);
        self.entries.borrow_mut().insert(key, resolution);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub(crate) fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// `(hits, misses)` since creation.
    pub(crate) fn stats(&self) -> (u64, u64) {
        (self.hits.get(), self.misses.get())
    }
}
