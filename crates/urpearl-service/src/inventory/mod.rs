//! Inventory management services.

mod service;

pub use service::{BulkInventoryOutcome, BulkInventoryUpdate, InventoryService};
