use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use larder_core::{DomainError, DomainResult, SupplierId};
use larder_parties::{NewSupplier, Supplier, SupplierPatch};

use super::{conflict_or_internal, internal};

const SUPPLIER_CONSTRAINTS: &[(&str, &str)] = &[
    ("suppliers_email_key", "Supplier with this email already exists"),
    ("suppliers_phone_key", "Supplier with this phone number already exists"),
];

/// Postgres suppliers.
#[derive(Clone)]
pub struct PgPartyStore {
    pool: PgPool,
}

impl PgPartyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, input), err)]
    pub async fn create_supplier(&self, input: NewSupplier) -> DomainResult<Supplier> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO suppliers (name, email, phone, country_code, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING supplier_id, name, email, phone, country_code,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.country_code)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_internal(e, SUPPLIER_CONSTRAINTS))?;
        supplier_from_row(&row)
    }

    #[instrument(skip(self), err)]
    pub async fn list_suppliers(&self) -> DomainResult<Vec<Supplier>> {
        let rows = sqlx::query(
            "SELECT supplier_id, name, email, phone, country_code, \
                    created_at, updated_at, deleted_at \
             FROM suppliers ORDER BY supplier_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        rows.iter().map(supplier_from_row).collect()
    }

    #[instrument(skip(self), err)]
    pub async fn get_supplier(&self, id: SupplierId) -> DomainResult<Supplier> {
        let row = sqlx::query(
            "SELECT supplier_id, name, email, phone, country_code, \
                    created_at, updated_at, deleted_at \
             FROM suppliers WHERE supplier_id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(internal)?;
        match row {
            Some(row) => supplier_from_row(&row),
            None => Err(DomainError::not_found("Supplier not found")),
        }
    }

    #[instrument(skip(self, patch), err)]
    pub async fn update_supplier(
        &self,
        id: SupplierId,
        patch: SupplierPatch,
    ) -> DomainResult<Supplier> {
        let mut supplier = self.get_supplier(id).await?;
        patch.apply(&mut supplier, Utc::now());
        sqlx::query(
            "UPDATE suppliers SET name = $2, email = $3, phone = $4, country_code = $5, \
                    updated_at = $6 \
             WHERE supplier_id = $1",
        )
        .bind(id.as_i64())
        .bind(&supplier.name)
        .bind(&supplier.email)
        .bind(&supplier.phone)
        .bind(&supplier.country_code)
        .bind(supplier.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_internal(e, SUPPLIER_CONSTRAINTS))?;
        Ok(supplier)
    }

    #[instrument(skip(self), err)]
    pub async fn delete_supplier(&self, id: SupplierId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE supplier_id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Supplier not found"));
        }
        Ok(())
    }
}

fn supplier_from_row(row: &PgRow) -> DomainResult<Supplier> {
    Ok(Supplier {
        supplier_id: SupplierId::from_i64(row.try_get("supplier_id").map_err(internal)?),
        name: row.try_get("name").map_err(internal)?,
        email: row.try_get("email").map_err(internal)?,
        phone: row.try_get("phone").map_err(internal)?,
        country_code: row.try_get("country_code").map_err(internal)?,
        created_at: row.try_get("created_at").map_err(internal)?,
        updated_at: row.try_get("updated_at").map_err(internal)?,
        deleted_at: row.try_get("deleted_at").map_err(internal)?,
    })
}
