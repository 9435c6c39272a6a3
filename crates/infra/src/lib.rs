//! Storage adapters: resource stores (in-memory and Postgres) and the
//! request-audit log.
//!
//! Stores return `DomainResult`; uniqueness violations surface as
//! `DomainError::Conflict` carrying the client-facing message, so callers
//! map errors to HTTP without inspecting backend details.

pub mod audit;
pub mod stores;

pub use audit::{
    redact_in_place, AuditEntry, AuditStore, InMemoryAuditStore, PostgresAuditStore,
    REDACTION_MARKER,
};
pub use stores::memory::{
    MemoryAccountStore, MemoryCatalogStore, MemoryInventoryStore, MemoryPartyStore,
    MemorySiteStore,
};
pub use stores::postgres::{
    PgAccountStore, PgCatalogStore, PgInventoryStore, PgPartyStore, PgSiteStore,
};
