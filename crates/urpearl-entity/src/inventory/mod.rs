//! Inventory entity.

mod model;

pub use model::{Inventory, InventoryStats, DEFAULT_LOW_STOCK_THRESHOLD};
