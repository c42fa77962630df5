//! Route definitions for the UrPearl SHOP HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::state::AppState;

/// Build the Axum router with all routes mounted under `/api`.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`. Middleware layers are applied
/// in [`crate::app::build_app`].
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(catalog_routes())
        .merge(cart_routes())
        .merge(checkout_routes())
        .merge(order_routes())
        .merge(rating_routes())
        .merge(admin_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Liveness and database reachability
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Auth endpoints: OAuth sign-in, current user
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/oauth", post(handlers::auth::oauth_sign_in))
        .route("/auth/me", get(handlers::auth::me))
}

/// Public storefront catalog
fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(handlers::product::list_products))
        .route("/products/{slug}", get(handlers::product::get_product))
        .route("/categories", get(handlers::category::list_categories))
}

/// Cart CRUD and stock validation
fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(handlers::cart::get_cart))
        .route("/cart", delete(handlers::cart::clear_cart))
        .route("/cart/items", post(handlers::cart::add_item))
        .route("/cart/items/{id}", put(handlers::cart::update_item))
        .route("/cart/items/{id}", delete(handlers::cart::remove_item))
        .route("/cart/summary", get(handlers::cart::cart_summary))
        .route("/cart/validate", get(handlers::cart::validate_cart))
}

/// Payment intent creation and order placement
fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout/intent", post(handlers::checkout::create_intent))
        .route("/checkout", post(handlers::checkout::checkout))
}

/// Buyer order history and cancellation
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(handlers::order::list_orders))
        .route("/orders/{id}", get(handlers::order::get_order))
        .route("/orders/{id}/cancel", post(handlers::order::cancel_order))
}

/// Product reviews: public listing plus buyer-owned mutations
fn rating_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products/{slug}/ratings",
            get(handlers::rating::list_product_ratings).post(handlers::rating::create_rating),
        )
        .route("/ratings/{id}", put(handlers::rating::update_rating))
        .route("/ratings/{id}", delete(handlers::rating::delete_rating))
}

/// Admin back-office: catalog CRUD, inventory, orders, stats, notifications
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/products",
            post(handlers::admin::products::create_product),
        )
        .route(
            "/admin/products/{id}",
            put(handlers::admin::products::update_product),
        )
        .route(
            "/admin/products/{id}",
            delete(handlers::admin::products::delete_product),
        )
        .route(
            "/admin/categories",
            post(handlers::admin::categories::create_category),
        )
        .route(
            "/admin/categories/{id}",
            put(handlers::admin::categories::update_category),
        )
        .route(
            "/admin/categories/{id}",
            delete(handlers::admin::categories::delete_category),
        )
        .route(
            "/admin/inventory",
            get(handlers::admin::inventory::list_inventory),
        )
        .route(
            "/admin/inventory/low-stock",
            get(handlers::admin::inventory::list_low_stock),
        )
        .route(
            "/admin/inventory/bulk",
            post(handlers::admin::inventory::bulk_update),
        )
        .route(
            "/admin/inventory/{product_id}",
            put(handlers::admin::inventory::update_stock),
        )
        .route(
            "/admin/inventory/{product_id}/adjust",
            post(handlers::admin::inventory::adjust_stock),
        )
        .route(
            "/admin/inventory/{product_id}/threshold",
            put(handlers::admin::inventory::update_threshold),
        )
        .route("/admin/orders", get(handlers::admin::orders::list_orders))
        .route("/admin/orders", post(handlers::admin::orders::create_order))
        .route(
            "/admin/orders/{id}/status",
            put(handlers::admin::orders::update_order_status),
        )
        .route("/admin/stats", get(handlers::admin::stats::dashboard_stats))
        .route(
            "/admin/notifications",
            get(handlers::admin::notifications::list_notifications),
        )
        .route(
            "/admin/notifications/read-all",
            post(handlers::admin::notifications::mark_all_read),
        )
        .route(
            "/admin/notifications/{id}/read",
            post(handlers::admin::notifications::mark_read),
        )
}
