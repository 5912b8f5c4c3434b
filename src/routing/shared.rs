//! Atomically replaceable routing table.
//!
//! Readers take a snapshot with [`SharedRoutes::load`] and dispatch against
//! it; a reload builds a complete new table and swaps the pointer. A reader
//! therefore sees either the old table or the new one, never a mix, and a
//! snapshot taken before a swap stays valid until it is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::routing::table::RoutingTable;

pub struct SharedRoutes<E> {
    current: ArcSwap<RoutingTable<E>>,
    generation: AtomicU64,
}

impl<E> SharedRoutes<E> {
    pub fn new(table: RoutingTable<E>) -> Self {
        Self {
            current: ArcSwap::from_pointee(table),
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot of the live table.
    pub fn load(&self) -> Arc<RoutingTable<E>> {
        self.current.load_full()
    }

    /// Install `table`, returning the one it replaced.
    pub fn replace(&self, table: RoutingTable<E>) -> Arc<RoutingTable<E>> {
        let previous = self.current.swap(Arc::new(table));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::info!(
            generation,
            rules = self.current.load().len(),
            "Routing table replaced"
        );
        previous
    }

    /// Number of replacements since construction.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_survives_replace() {
        let shared = SharedRoutes::new(RoutingTable::builder().route("old/", "old").build().unwrap());
        let before = shared.load();

        let previous = shared.replace(RoutingTable::builder().route("new/", "new").build().unwrap());
        assert!(Arc::ptr_eq(&before, &previous));
        assert_eq!(shared.generation(), 1);

        assert!(before.dispatch("old/").is_match());
        assert!(!before.dispatch("new/").is_match());

        let after = shared.load();
        assert!(after.dispatch("new/").is_match());
        assert!(!after.dispatch("old/").is_match());
    }
}
