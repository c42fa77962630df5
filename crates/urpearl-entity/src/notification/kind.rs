//! Notification kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use urpearl_core::AppError;

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A product's inventory dropped to or below its threshold.
    LowStock,
    /// A new order was placed.
    OrderCreated,
    /// An order moved to a new lifecycle state.
    OrderStatusChanged,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::LowStock => "low_stock",
            NotificationKind::OrderCreated => "order_created",
            NotificationKind::OrderStatusChanged => "order_status_changed",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low_stock" => Ok(NotificationKind::LowStock),
            "order_created" => Ok(NotificationKind::OrderCreated),
            "order_status_changed" => Ok(NotificationKind::OrderStatusChanged),
            other => Err(AppError::validation(format!(
                "Unknown notification kind: {other}"
            ))),
        }
    }
}
