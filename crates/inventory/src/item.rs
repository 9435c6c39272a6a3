use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{validate, DomainResult, ItemId, SupplierId};

/// A stock-keeping inventory item (an ingredient, not a sellable product).
///
/// Items carry no uniqueness constraint; two branches may well stock
/// identically named goods from different suppliers. `supplier_id` is an
/// untyped reference.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    pub item_id: ItemId,
    pub name: String,
    pub cost: f64,
    pub unit: String,
    pub stock_warning_level: f64,
    pub supplier_id: SupplierId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl InventoryItem {
    pub fn new(item_id: ItemId, input: NewItem, now: DateTime<Utc>) -> Self {
        Self {
            item_id,
            name: input.name,
            cost: input.cost,
            unit: input.unit,
            stock_warning_level: input.stock_warning_level,
            supplier_id: input.supplier_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn view(&self) -> ItemView {
        ItemView {
            id: self.item_id,
            name: self.name.clone(),
            cost: self.cost,
            unit: self.unit.clone(),
            stock_warning_level: self.stock_warning_level,
            supplier_id: self.supplier_id,
        }
    }
}

/// Public serialization of an inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: ItemId,
    pub name: String,
    pub cost: f64,
    pub unit: String,
    pub stock_warning_level: f64,
    pub supplier_id: SupplierId,
}

/// Input for creating an inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub cost: f64,
    pub unit: String,
    pub stock_warning_level: f64,
    pub supplier_id: SupplierId,
}

impl NewItem {
    pub fn validate(&self) -> DomainResult<()> {
        validate::require_len("name", &self.name, 3, 50)?;
        validate::require_finite("cost", self.cost)?;
        validate::require_len("unit", &self.unit, 1, 20)?;
        validate::require_finite("stock_warning_level", self.stock_warning_level)?;
        Ok(())
    }
}

/// Partial update for an inventory item; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub cost: Option<f64>,
    pub unit: Option<String>,
    pub stock_warning_level: Option<f64>,
    pub supplier_id: Option<SupplierId>,
}

impl ItemPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            validate::require_len("name", name, 3, 50)?;
        }
        if let Some(cost) = self.cost {
            validate::require_finite("cost", cost)?;
        }
        if let Some(unit) = &self.unit {
            validate::require_len("unit", unit, 1, 20)?;
        }
        if let Some(level) = self.stock_warning_level {
            validate::require_finite("stock_warning_level", level)?;
        }
        Ok(())
    }

    pub fn apply(&self, item: &mut InventoryItem, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(cost) = self.cost {
            item.cost = cost;
        }
        if let Some(unit) = &self.unit {
            item.unit = unit.clone();
        }
        if let Some(level) = self.stock_warning_level {
            item.stock_warning_level = level;
        }
        if let Some(supplier_id) = self.supplier_id {
            item.supplier_id = supplier_id;
        }
        item.updated_at = now;
    }
}
