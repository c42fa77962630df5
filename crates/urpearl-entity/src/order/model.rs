//! Order and order line models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use super::{OrderStatus, ShippingAddress};

/// A placed order.
///
/// `total_amount` is the sum of line totals frozen at checkout time;
/// later price changes never touch an existing order.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Sum of `unit_price * quantity` over all lines, in major units.
    pub total_amount: Decimal,
    pub status: OrderStatus,
    /// Provider-side payment intent backing this order, if any.
    pub payment_intent_id: Option<String>,
    pub shipping_address: Json<ShippingAddress>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn can_cancel(&self) -> bool {
        self.status.can_cancel()
    }
}

/// One product line on an order, with name and price snapshotted at
/// purchase time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    /// Product name at purchase time.
    pub product_name: String,
    pub quantity: i32,
    /// Per-unit price at purchase time, in major units.
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Input line for explicit order creation (buy-now and admin paths).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Back-office order counters.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderStats {
    pub total_orders: i64,
    pub pending: i64,
    pub paid: i64,
    pub shipped: i64,
    pub cancelled: i64,
    /// Revenue over paid and shipped orders, in major units.
    pub total_revenue: Decimal,
}
