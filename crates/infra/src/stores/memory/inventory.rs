use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use larder_core::{BranchId, DomainError, DomainResult, ItemId};
use larder_inventory::{
    InventoryItem, ItemPatch, NewItem, NewStockCount, StockCount, StockCountPatch,
};

use super::{read, write, Sequence};

/// In-memory inventory items and per-branch stock counts.
#[derive(Debug, Default)]
pub struct MemoryInventoryStore {
    items: RwLock<HashMap<ItemId, InventoryItem>>,
    stock_counts: RwLock<HashMap<(BranchId, ItemId), StockCount>>,
    item_seq: Sequence,
}

impl MemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items carry no unique field, so creation cannot conflict.
    pub fn create_item(&self, input: NewItem) -> DomainResult<InventoryItem> {
        let mut items = write(&self.items)?;
        let item = InventoryItem::new(ItemId::from_i64(self.item_seq.next()), input, Utc::now());
        items.insert(item.item_id, item.clone());
        Ok(item)
    }

    pub fn list_items(&self) -> DomainResult<Vec<InventoryItem>> {
        let items = read(&self.items)?;
        let mut all: Vec<InventoryItem> = items.values().cloned().collect();
        all.sort_by_key(|i| i.item_id);
        Ok(all)
    }

    pub fn get_item(&self, id: ItemId) -> DomainResult<InventoryItem> {
        read(&self.items)?
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Inventory item not found"))
    }

    pub fn update_item(&self, id: ItemId, patch: ItemPatch) -> DomainResult<InventoryItem> {
        let mut items = write(&self.items)?;
        match items.get_mut(&id) {
            Some(item) => {
                patch.apply(item, Utc::now());
                Ok(item.clone())
            }
            None => Err(DomainError::not_found("Inventory item not found")),
        }
    }

    pub fn delete_item(&self, id: ItemId) -> DomainResult<()> {
        write(&self.items)?
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Inventory item not found"))
    }

    pub fn create_stock_count(&self, input: NewStockCount) -> DomainResult<StockCount> {
        let mut counts = write(&self.stock_counts)?;
        let key = (input.branch_id, input.item_id);
        if counts.contains_key(&key) {
            return Err(DomainError::conflict(
                "Branch stock count with this branch_id and item_id already exists",
            ));
        }
        let count = StockCount::new(input, Utc::now());
        counts.insert(key, count.clone());
        Ok(count)
    }

    pub fn list_stock_counts(&self) -> DomainResult<Vec<StockCount>> {
        let counts = read(&self.stock_counts)?;
        let mut all: Vec<StockCount> = counts.values().cloned().collect();
        all.sort_by_key(|c| (c.branch_id, c.item_id));
        Ok(all)
    }

    pub fn get_stock_count(&self, branch_id: BranchId, item_id: ItemId) -> DomainResult<StockCount> {
        read(&self.stock_counts)?
            .get(&(branch_id, item_id))
            .cloned()
            .ok_or_else(|| DomainError::not_found("Branch stock count not found"))
    }

    pub fn update_stock_count(
        &self,
        branch_id: BranchId,
        item_id: ItemId,
        patch: StockCountPatch,
    ) -> DomainResult<StockCount> {
        let mut counts = write(&self.stock_counts)?;
        match counts.get_mut(&(branch_id, item_id)) {
            Some(count) => {
                patch.apply(count, Utc::now());
                Ok(count.clone())
            }
            None => Err(DomainError::not_found("Branch stock count not found")),
        }
    }

    pub fn delete_stock_count(&self, branch_id: BranchId, item_id: ItemId) -> DomainResult<()> {
        write(&self.stock_counts)?
            .remove(&(branch_id, item_id))
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Branch stock count not found"))
    }
}
