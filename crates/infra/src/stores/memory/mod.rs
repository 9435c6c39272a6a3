//! In-memory resource stores.
//!
//! Maps behind `RwLock`s, with ids handed out by per-resource sequences
//! starting at 1, mirroring the relational backend's autoincrement columns.
//! Intended for tests/dev.

pub mod accounts;
pub mod catalog;
pub mod inventory;
pub mod parties;
pub mod sites;

pub use accounts::MemoryAccountStore;
pub use catalog::MemoryCatalogStore;
pub use inventory::MemoryInventoryStore;
pub use parties::MemoryPartyStore;
pub use sites::MemorySiteStore;

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use larder_core::{DomainError, DomainResult};

/// Monotonic id source; the first id handed out is 1.
#[derive(Debug)]
pub(crate) struct Sequence(AtomicI64);

impl Sequence {
    pub(crate) fn new() -> Self {
        Self(AtomicI64::new(1))
    }

    pub(crate) fn next(&self) -> i64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn read<T>(lock: &RwLock<T>) -> DomainResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| DomainError::internal("store lock poisoned"))
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> DomainResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| DomainError::internal("store lock poisoned"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_starts_at_one() {
        let seq = Sequence::new();
        assert_eq!(seq.next(), 1);
        assert_eq!(seq.next(), 2);
        assert_eq!(seq.next(), 3);
    }
}
