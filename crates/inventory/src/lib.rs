//! Inventory domain module: stock-keeping items and per-branch stock counts.

pub mod item;
pub mod stock_count;

pub use item::{InventoryItem, ItemPatch, ItemView, NewItem};
pub use stock_count::{NewStockCount, StockCount, StockCountPatch, StockCountView};
