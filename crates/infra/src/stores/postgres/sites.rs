use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use larder_core::{BranchId, DomainError, DomainResult, OutletId, ProductId};
use larder_sites::{Branch, BranchPatch, NewBranch, NewOutlet, Outlet, OutletPatch};

use super::{conflict_or_internal, internal};

const BRANCH_CONSTRAINTS: &[(&str, &str)] = &[
    ("branches_name_key", "Branch with this name already exists"),
    ("branches_address_key", "Branch with this address already exists"),
];

const OUTLET_CONSTRAINTS: &[(&str, &str)] =
    &[("outlets_name_key", "Outlet with this name already exists")];

/// Postgres branches and outlets.
#[derive(Clone)]
pub struct PgSiteStore {
    pool: PgPool,
}

impl PgSiteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, input), err)]
    pub async fn create_branch(&self, input: NewBranch) -> DomainResult<Branch> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO branches (name, address, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING branch_id, name, address, created_at, updated_at, deleted_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.address)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_internal(e, BRANCH_CONSTRAINTS))?;
        branch_from_row(&row)
    }

    #[instrument(skip(self), err)]
    pub async fn list_branches(&self) -> DomainResult<Vec<Branch>> {
        let rows = sqlx::query(
            "SELECT branch_id, name, address, created_at, updated_at, deleted_at \
             FROM branches ORDER BY branch_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        rows.iter().map(branch_from_row).collect()
    }

    #[instrument(skip(self), err)]
    pub async fn get_branch(&self, id: BranchId) -> DomainResult<Branch> {
        let row = sqlx::query(
            "SELECT branch_id, name, address, created_at, updated_at, deleted_at \
             FROM branches WHERE branch_id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(internal)?;
        match row {
            Some(row) => branch_from_row(&row),
            None => Err(DomainError::not_found("Branch not found")),
        }
    }

    #[instrument(skip(self, patch), err)]
    pub async fn update_branch(&self, id: BranchId, patch: BranchPatch) -> DomainResult<Branch> {
        let mut branch = self.get_branch(id).await?;
        patch.apply(&mut branch, Utc::now());
        sqlx::query(
            "UPDATE branches SET name = $2, address = $3, updated_at = $4 WHERE branch_id = $1",
        )
        .bind(id.as_i64())
        .bind(&branch.name)
        .bind(&branch.address)
        .bind(branch.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_internal(e, BRANCH_CONSTRAINTS))?;
        Ok(branch)
    }

    #[instrument(skip(self), err)]
    pub async fn delete_branch(&self, id: BranchId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM branches WHERE branch_id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Branch not found"));
        }
        Ok(())
    }

    #[instrument(skip(self, input), err)]
    pub async fn create_outlet(&self, input: NewOutlet) -> DomainResult<Outlet> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO outlets (product_id, name, price, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING outlet_id, product_id, name, price, created_at, updated_at, deleted_at
            "#,
        )
        .bind(input.product_id.as_i64())
        .bind(&input.name)
        .bind(input.price)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_internal(e, OUTLET_CONSTRAINTS))?;
        outlet_from_row(&row)
    }

    #[instrument(skip(self), err)]
    pub async fn list_outlets(&self, product_id: Option<ProductId>) -> DomainResult<Vec<Outlet>> {
        let rows = sqlx::query(
            "SELECT outlet_id, product_id, name, price, created_at, updated_at, deleted_at \
             FROM outlets WHERE $1::BIGINT IS NULL OR product_id = $1 ORDER BY outlet_id",
        )
        .bind(product_id.map(|p| p.as_i64()))
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        rows.iter().map(outlet_from_row).collect()
    }

    #[instrument(skip(self), err)]
    pub async fn get_outlet(&self, id: OutletId) -> DomainResult<Outlet> {
        let row = sqlx::query(
            "SELECT outlet_id, product_id, name, price, created_at, updated_at, deleted_at \
             FROM outlets WHERE outlet_id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(internal)?;
        match row {
            Some(row) => outlet_from_row(&row),
            None => Err(DomainError::not_found("Outlet not found")),
        }
    }

    #[instrument(skip(self, patch), err)]
    pub async fn update_outlet(&self, id: OutletId, patch: OutletPatch) -> DomainResult<Outlet> {
        let mut outlet = self.get_outlet(id).await?;
        patch.apply(&mut outlet, Utc::now());
        sqlx::query(
            "UPDATE outlets SET product_id = $2, name = $3, price = $4, updated_at = $5 \
             WHERE outlet_id = $1",
        )
        .bind(id.as_i64())
        .bind(outlet.product_id.as_i64())
        .bind(&outlet.name)
        .bind(outlet.price)
        .bind(outlet.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_internal(e, OUTLET_CONSTRAINTS))?;
        Ok(outlet)
    }

    #[instrument(skip(self), err)]
    pub async fn delete_outlet(&self, id: OutletId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM outlets WHERE outlet_id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Outlet not found"));
        }
        Ok(())
    }
}

fn branch_from_row(row: &PgRow) -> DomainResult<Branch> {
    Ok(Branch {
        branch_id: BranchId::from_i64(row.try_get("branch_id").map_err(internal)?),
        name: row.try_get("name").map_err(internal)?,
        address: row.try_get("address").map_err(internal)?,
        created_at: row.try_get("created_at").map_err(internal)?,
        updated_at: row.try_get("updated_at").map_err(internal)?,
        deleted_at: row.try_get("deleted_at").map_err(internal)?,
    })
}

fn outlet_from_row(row: &PgRow) -> DomainResult<Outlet> {
    Ok(Outlet {
        outlet_id: OutletId::from_i64(row.try_get("outlet_id").map_err(internal)?),
        product_id: ProductId::from_i64(row.try_get("product_id").map_err(internal)?),
        name: row.try_get("name").map_err(internal)?,
        price: row.try_get("price").map_err(internal)?,
        created_at: row.try_get("created_at").map_err(internal)?,
        updated_at: row.try_get("updated_at").map_err(internal)?,
        deleted_at: row.try_get("deleted_at").map_err(internal)?,
    })
}
