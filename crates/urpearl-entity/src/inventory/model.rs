//! Per-product stock counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::product::StockStatus;

/// Threshold applied when an inventory row is created without one.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 5;

/// Stock record for a single product.
///
/// `quantity` never goes negative: every decrement is guarded at the
/// database level, so a row observed here is always consistent.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Inventory {
    pub id: Uuid,
    pub product_id: Uuid,
    /// Units on hand.
    pub quantity: i32,
    /// Restock alerts fire at or below this level.
    pub low_stock_threshold: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Back-office stock band counters over the whole catalog.
///
/// A product without an inventory row counts as out of stock.
#[derive(Debug, Clone, Copy, Serialize, sqlx::FromRow)]
pub struct InventoryStats {
    pub total_products: i64,
    pub in_stock: i64,
    pub low_stock: i64,
    pub out_of_stock: i64,
}

impl Inventory {
    /// Whether stock has reached the alert level.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.low_stock_threshold
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }

    /// Whether `requested` units can be taken without going negative.
    pub fn can_fulfill(&self, requested: i32) -> bool {
        requested > 0 && requested <= self.quantity
    }

    pub fn stock_status(&self) -> StockStatus {
        StockStatus::derive(Some(self.quantity), Some(self.low_stock_threshold))
    }
}
