//! Response envelopes.
//!
//! Every JSON body leaving the API is wrapped in [`ApiResponse`] (or its
//! error twin in [`crate::error`]) so clients can branch on `success`
//! without inspecting status codes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use urpearl_core::types::PageResponse;
use urpearl_entity::{InventoryStats, Notification, OrderStats, User};

/// Standard success envelope: `{"success": true, "message": ..., "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Builds a success envelope with the given message and payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// Payload of `GET /api/health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

/// Payload of `POST /api/auth/oauth`: the signed-in user plus a bearer token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Payload of `GET /api/cart/summary`: the storefront badge numbers
/// without the full line join.
#[derive(Debug, Serialize)]
pub struct CartSummaryResponse {
    pub item_count: i64,
    pub total: Decimal,
}

/// Payload of `GET /api/cart/validate`.
#[derive(Debug, Serialize)]
pub struct CartValidationResponse {
    /// True when every line can be fulfilled at current stock levels.
    pub valid: bool,
    /// Human-readable description of each problem line, empty when valid.
    pub problems: Vec<String>,
}

/// Payload of `GET /api/admin/stats`.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub orders: OrderStats,
    pub inventory: InventoryStats,
}

/// Payload of `GET /api/admin/notifications`.
#[derive(Debug, Serialize)]
pub struct NotificationListResponse {
    /// Unread notifications across all pages, not just this one.
    pub unread_count: i64,
    pub notifications: PageResponse<Notification>,
}

/// Payload for endpoints that report how many rows they touched.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}
