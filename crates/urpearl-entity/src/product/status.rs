//! Derived stock status for storefront display.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::inventory::DEFAULT_LOW_STOCK_THRESHOLD;

/// Display-level availability band for a product.
///
/// Derived from the inventory row at read time, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// Band for a quantity/threshold pair as read from the database.
    ///
    /// A product without an inventory row (`quantity` is `None`) is
    /// treated as out of stock. A missing threshold falls back to
    /// [`DEFAULT_LOW_STOCK_THRESHOLD`].
    pub fn derive(quantity: Option<i32>, low_stock_threshold: Option<i32>) -> Self {
        let quantity = quantity.unwrap_or(0);
        let threshold = low_stock_threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
        if quantity <= 0 {
            StockStatus::OutOfStock
        } else if quantity <= threshold {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in_stock",
            StockStatus::LowStock => "low_stock",
            StockStatus::OutOfStock => "out_of_stock",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
