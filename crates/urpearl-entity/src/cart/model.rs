//! Shopping cart models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One product entry in a user's cart.
///
/// A user holds at most one row per product; adding the same product
/// again merges into the existing row's quantity.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cart read model: a cart row joined with live product and stock data,
/// priced at the product's current price.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartLine {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub product_slug: String,
    pub image_url: Option<String>,
    /// Current catalog price per unit, in major units.
    pub unit_price: Decimal,
    pub quantity: i32,
    /// Units currently on hand for this product.
    pub in_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartLine {
    /// `unit_price * quantity`, exact in decimal arithmetic.
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Whether the requested quantity is still available.
    pub fn is_fulfillable(&self) -> bool {
        self.quantity <= self.in_stock
    }
}
