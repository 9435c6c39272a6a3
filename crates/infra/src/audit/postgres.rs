use sqlx::PgPool;
use tracing::instrument;

use larder_core::{DomainError, DomainResult};

use super::entry::AuditEntry;

/// Postgres-backed append-only audit sink.
///
/// Entries are stored as one JSONB document per row in the table named at
/// construction, so the persisted shape matches the in-memory one exactly.
pub struct PostgresAuditStore {
    pool: PgPool,
    table: String,
}

impl PostgresAuditStore {
    pub fn new(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }

    /// Create the audit table when it does not exist yet.
    pub async fn init_schema(&self) -> DomainResult<()> {
        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS "{table}" (
                id UUID PRIMARY KEY,
                logged_at TIMESTAMPTZ NOT NULL,
                entry JSONB NOT NULL
            )
            "#,
            table = self.table
        );
        sqlx::query(&ddl)
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        Ok(())
    }

    #[instrument(skip(self, entry), fields(method = %entry.method, endpoint = %entry.endpoint))]
    pub async fn append(&self, entry: AuditEntry) -> DomainResult<()> {
        let document = serde_json::to_value(&entry).map_err(internal)?;
        let insert = format!(
            r#"INSERT INTO "{table}" (id, logged_at, entry) VALUES ($1, $2, $3)"#,
            table = self.table
        );
        sqlx::query(&insert)
            .bind(entry.id)
            .bind(entry.timestamp)
            .bind(document)
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        Ok(())
    }
}

fn internal(err: impl std::fmt::Display) -> DomainError {
    DomainError::internal(err.to_string())
}
