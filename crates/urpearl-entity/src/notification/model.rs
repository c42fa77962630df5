//! In-app notification model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::NotificationKind;

/// An in-app message addressed to one user.
///
/// Admin alerts (low stock, new orders) fan out as one row per admin.
/// `product_id` and `order_id` tie the row back to its subject and
/// drive de-duplication of repeat alerts.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    /// Recipient.
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Subject product, set for low-stock alerts.
    pub product_id: Option<Uuid>,
    /// Subject order, set for order notifications.
    pub order_id: Option<Uuid>,
    /// Extra structured context for clients.
    pub payload: Option<serde_json::Value>,
    /// Set when the recipient marked the row read.
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_unread(&self) -> bool {
        self.read_at.is_none()
    }
}
