use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{validate, BranchId, DomainResult, ItemId};

/// How much of one inventory item a branch holds and has on order.
///
/// Keyed by the `(branch_id, item_id)` pair; there is no surrogate id.
#[derive(Debug, Clone, PartialEq)]
pub struct StockCount {
    pub branch_id: BranchId,
    pub item_id: ItemId,
    pub in_stock: f64,
    pub ordered_qty: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl StockCount {
    pub fn new(input: NewStockCount, now: DateTime<Utc>) -> Self {
        Self {
            branch_id: input.branch_id,
            item_id: input.item_id,
            in_stock: input.in_stock,
            ordered_qty: input.ordered_qty,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn view(&self) -> StockCountView {
        StockCountView {
            branch_id: self.branch_id,
            item_id: self.item_id,
            in_stock: self.in_stock,
            ordered_qty: self.ordered_qty,
        }
    }
}

/// Public serialization of a stock count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockCountView {
    pub branch_id: BranchId,
    pub item_id: ItemId,
    pub in_stock: f64,
    pub ordered_qty: f64,
}

/// Input for creating a stock count; the caller supplies both key components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStockCount {
    pub branch_id: BranchId,
    pub item_id: ItemId,
    pub in_stock: f64,
    pub ordered_qty: f64,
}

impl NewStockCount {
    pub fn validate(&self) -> DomainResult<()> {
        validate::require_finite("in_stock", self.in_stock)?;
        validate::require_finite("ordered_qty", self.ordered_qty)?;
        Ok(())
    }
}

/// Partial update for a stock count. The key pair is addressed by the route
/// and cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockCountPatch {
    pub in_stock: Option<f64>,
    pub ordered_qty: Option<f64>,
}

impl StockCountPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(in_stock) = self.in_stock {
            validate::require_finite("in_stock", in_stock)?;
        }
        if let Some(ordered_qty) = self.ordered_qty {
            validate::require_finite("ordered_qty", ordered_qty)?;
        }
        Ok(())
    }

    pub fn apply(&self, count: &mut StockCount, now: DateTime<Utc>) {
        if let Some(in_stock) = self.in_stock {
            count.in_stock = in_stock;
        }
        if let Some(ordered_qty) = self.ordered_qty {
            count.ordered_qty = ordered_qty;
        }
        count.updated_at = now;
    }
}
