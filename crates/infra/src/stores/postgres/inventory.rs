use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use larder_core::{BranchId, DomainError, DomainResult, ItemId, SupplierId};
use larder_inventory::{
    InventoryItem, ItemPatch, NewItem, NewStockCount, StockCount, StockCountPatch,
};

use super::{conflict_or_internal, internal};

const STOCK_COUNT_CONSTRAINTS: &[(&str, &str)] = &[(
    "branchstockcount_pkey",
    "Branch stock count with this branch_id and item_id already exists",
)];

/// Postgres inventory items and per-branch stock counts.
#[derive(Clone)]
pub struct PgInventoryStore {
    pool: PgPool,
}

impl PgInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, input), err)]
    pub async fn create_item(&self, input: NewItem) -> DomainResult<InventoryItem> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO inventoryitems
                (name, cost, unit, stock_warning_level, supplier_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING item_id, name, cost, unit, stock_warning_level, supplier_id,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(&input.name)
        .bind(input.cost)
        .bind(&input.unit)
        .bind(input.stock_warning_level)
        .bind(input.supplier_id.as_i64())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(internal)?;
        item_from_row(&row)
    }

    #[instrument(skip(self), err)]
    pub async fn list_items(&self) -> DomainResult<Vec<InventoryItem>> {
        let rows = sqlx::query(
            "SELECT item_id, name, cost, unit, stock_warning_level, supplier_id, \
                    created_at, updated_at, deleted_at \
             FROM inventoryitems ORDER BY item_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        rows.iter().map(item_from_row).collect()
    }

    #[instrument(skip(self), err)]
    pub async fn get_item(&self, id: ItemId) -> DomainResult<InventoryItem> {
        let row = sqlx::query(
            "SELECT item_id, name, cost, unit, stock_warning_level, supplier_id, \
                    created_at, updated_at, deleted_at \
             FROM inventoryitems WHERE item_id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(internal)?;
        match row {
            Some(row) => item_from_row(&row),
            None => Err(DomainError::not_found("Inventory item not found")),
        }
    }

    #[instrument(skip(self, patch), err)]
    pub async fn update_item(&self, id: ItemId, patch: ItemPatch) -> DomainResult<InventoryItem> {
        let mut item = self.get_item(id).await?;
        patch.apply(&mut item, Utc::now());
        sqlx::query(
            "UPDATE inventoryitems SET name = $2, cost = $3, unit = $4, \
                    stock_warning_level = $5, supplier_id = $6, updated_at = $7 \
             WHERE item_id = $1",
        )
        .bind(id.as_i64())
        .bind(&item.name)
        .bind(item.cost)
        .bind(&item.unit)
        .bind(item.stock_warning_level)
        .bind(item.supplier_id.as_i64())
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(internal)?;
        Ok(item)
    }

    #[instrument(skip(self), err)]
    pub async fn delete_item(&self, id: ItemId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM inventoryitems WHERE item_id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Inventory item not found"));
        }
        Ok(())
    }

    #[instrument(skip(self, input), err)]
    pub async fn create_stock_count(&self, input: NewStockCount) -> DomainResult<StockCount> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO branchstockcount
                (branch_id, item_id, in_stock, ordered_qty, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING branch_id, item_id, in_stock, ordered_qty,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(input.branch_id.as_i64())
        .bind(input.item_id.as_i64())
        .bind(input.in_stock)
        .bind(input.ordered_qty)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_internal(e, STOCK_COUNT_CONSTRAINTS))?;
        stock_count_from_row(&row)
    }

    #[instrument(skip(self), err)]
    pub async fn list_stock_counts(&self) -> DomainResult<Vec<StockCount>> {
        let rows = sqlx::query(
            "SELECT branch_id, item_id, in_stock, ordered_qty, created_at, updated_at, deleted_at \
             FROM branchstockcount ORDER BY branch_id, item_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        rows.iter().map(stock_count_from_row).collect()
    }

    #[instrument(skip(self), err)]
    pub async fn get_stock_count(
        &self,
        branch_id: BranchId,
        item_id: ItemId,
    ) -> DomainResult<StockCount> {
        let row = sqlx::query(
            "SELECT branch_id, item_id, in_stock, ordered_qty, created_at, updated_at, deleted_at \
             FROM branchstockcount WHERE branch_id = $1 AND item_id = $2",
        )
        .bind(branch_id.as_i64())
        .bind(item_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(internal)?;
        match row {
            Some(row) => stock_count_from_row(&row),
            None => Err(DomainError::not_found("Branch stock count not found")),
        }
    }

    #[instrument(skip(self, patch), err)]
    pub async fn update_stock_count(
        &self,
        branch_id: BranchId,
        item_id: ItemId,
        patch: StockCountPatch,
    ) -> DomainResult<StockCount> {
        let mut count = self.get_stock_count(branch_id, item_id).await?;
        patch.apply(&mut count, Utc::now());
        sqlx::query(
            "UPDATE branchstockcount SET in_stock = $3, ordered_qty = $4, updated_at = $5 \
             WHERE branch_id = $1 AND item_id = $2",
        )
        .bind(branch_id.as_i64())
        .bind(item_id.as_i64())
        .bind(count.in_stock)
        .bind(count.ordered_qty)
        .bind(count.updated_at)
        .execute(&self.pool)
        .await
        .map_err(internal)?;
        Ok(count)
    }

    #[instrument(skip(self), err)]
    pub async fn delete_stock_count(
        &self,
        branch_id: BranchId,
        item_id: ItemId,
    ) -> DomainResult<()> {
        let result =
            sqlx::query("DELETE FROM branchstockcount WHERE branch_id = $1 AND item_id = $2")
                .bind(branch_id.as_i64())
                .bind(item_id.as_i64())
                .execute(&self.pool)
                .await
                .map_err(internal)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Branch stock count not found"));
        }
        Ok(())
    }
}

fn item_from_row(row: &PgRow) -> DomainResult<InventoryItem> {
    Ok(InventoryItem {
        item_id: ItemId::from_i64(row.try_get("item_id").map_err(internal)?),
        name: row.try_get("name").map_err(internal)?,
        cost: row.try_get("cost").map_err(internal)?,
        unit: row.try_get("unit").map_err(internal)?,
        stock_warning_level: row.try_get("stock_warning_level").map_err(internal)?,
        supplier_id: SupplierId::from_i64(row.try_get("supplier_id").map_err(internal)?),
        created_at: row.try_get("created_at").map_err(internal)?,
        updated_at: row.try_get("updated_at").map_err(internal)?,
        deleted_at: row.try_get("deleted_at").map_err(internal)?,
    })
}

fn stock_count_from_row(row: &PgRow) -> DomainResult<StockCount> {
    Ok(StockCount {
        branch_id: BranchId::from_i64(row.try_get("branch_id").map_err(internal)?),
        item_id: ItemId::from_i64(row.try_get("item_id").map_err(internal)?),
        in_stock: row.try_get("in_stock").map_err(internal)?,
        ordered_qty: row.try_get("ordered_qty").map_err(internal)?,
        created_at: row.try_get("created_at").map_err(internal)?,
        updated_at: row.try_get("updated_at").map_err(internal)?,
        deleted_at: row.try_get("deleted_at").map_err(internal)?,
    })
}
