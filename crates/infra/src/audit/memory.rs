use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use larder_core::{DomainError, DomainResult};

use super::entry::AuditEntry;

/// In-memory append-only audit sink.
///
/// Intended for tests/dev. `close()` makes every later append fail, which is
/// how shutdown is modeled and how store-failure handling is exercised.
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    entries: Mutex<Vec<AuditEntry>>,
    closed: AtomicBool,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, entry: AuditEntry) -> DomainResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(DomainError::internal("audit store is closed"));
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| DomainError::internal("audit store lock poisoned"))?;
        entries.push(entry);
        Ok(())
    }

    /// Snapshot of everything appended so far, in append order.
    pub fn entries(&self) -> Vec<AuditEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(_) => vec![],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stop accepting entries.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
