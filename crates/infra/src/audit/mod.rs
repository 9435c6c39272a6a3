//! Request-audit log: entry shape, sensitive-field redaction, and the
//! append-only stores the entries land in.

pub mod entry;
pub mod memory;
pub mod postgres;
pub mod redact;

pub use entry::{at_second_precision, AuditEntry};
pub use memory::InMemoryAuditStore;
pub use postgres::PostgresAuditStore;
pub use redact::{redact_in_place, REDACTION_MARKER};

use std::sync::Arc;

use larder_core::DomainResult;

/// Backend-selected audit sink. Entries are append-only; nothing reads them
/// back on the request path.
#[derive(Clone)]
pub enum AuditStore {
    InMemory(Arc<InMemoryAuditStore>),
    Postgres(Arc<PostgresAuditStore>),
}

impl AuditStore {
    pub async fn append(&self, entry: AuditEntry) -> DomainResult<()> {
        match self {
            Self::InMemory(store) => store.append(entry),
            Self::Postgres(store) => store.append(entry).await,
        }
    }
}
