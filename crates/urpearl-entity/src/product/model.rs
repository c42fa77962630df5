//! Product catalog models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StockStatus;

/// A sellable catalog item.
///
/// Price is a fixed-point decimal in major currency units (pesos);
/// conversion to minor units happens only at the payment boundary.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    /// URL-safe identifier, unique across products.
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    /// Merchant stock-keeping unit, unique across products.
    pub sku: String,
    pub category_id: Option<Uuid>,
    pub image_url: Option<String>,
    /// Storefront badge flags.
    pub is_new_arrival: bool,
    pub is_best_seller: bool,
    /// Free-form size label, e.g. `"7.5-8mm"`.
    pub size: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a product. The slug is resolved by the service
/// before this reaches the repository.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub sku: String,
    pub category_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub is_new_arrival: bool,
    pub is_best_seller: bool,
    pub size: Option<String>,
}

/// Patch fields for updating a product. `None` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub sku: Option<String>,
    pub category_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub is_new_arrival: Option<bool>,
    pub is_best_seller: Option<bool>,
    pub size: Option<String>,
}

/// Catalog read model: a product joined with its inventory counters and
/// rating aggregate, as returned by listing and detail queries.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub sku: String,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub image_url: Option<String>,
    pub is_new_arrival: bool,
    pub is_best_seller: bool,
    pub size: Option<String>,
    /// On-hand quantity; `None` when no inventory row exists.
    pub quantity: Option<i32>,
    pub low_stock_threshold: Option<i32>,
    /// Mean of all rating scores, 0.0 when unrated.
    pub average_rating: f64,
    pub rating_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductSummary {
    /// Availability band derived from the joined inventory columns.
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::derive(self.quantity, self.low_stock_threshold)
    }
}
