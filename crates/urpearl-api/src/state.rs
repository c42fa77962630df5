//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use urpearl_auth::JwtDecoder;
use urpearl_core::config::AppConfig;
use urpearl_service::{
    CartService, CatalogService, InventoryService, NotificationService, OrderService,
    RatingService, UserService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Sign-in and profile service
    pub user_service: Arc<UserService>,
    /// Product and category catalog service
    pub catalog_service: Arc<CatalogService>,
    /// Shopping cart service
    pub cart_service: Arc<CartService>,
    /// Stock management service
    pub inventory_service: Arc<InventoryService>,
    /// Orders and checkout service
    pub order_service: Arc<OrderService>,
    /// Ratings and reviews service
    pub rating_service: Arc<RatingService>,
    /// Admin notification service
    pub notification_service: Arc<NotificationService>,
}
