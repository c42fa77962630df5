//! Application builder: wires router, middleware and state into an Axum app.

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, extract::DefaultBodyLimit, middleware as axum_middleware};
use sqlx::PgPool;
use tokio::sync::watch;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use urpearl_auth::{JwtDecoder, JwtEncoder};
use urpearl_core::config::{AppConfig, PaymentConfig};
use urpearl_core::error::AppError;
use urpearl_core::result::AppResult;
use urpearl_database::repositories::{
    CartRepository, CategoryRepository, InventoryRepository, NotificationRepository,
    OrderRepository, ProductRepository, RatingRepository, UserRepository,
};
use urpearl_payment::{MockPaymentProvider, PaymentProvider, StripeProvider};
use urpearl_service::{
    CartService, CatalogService, InventoryService, NotificationService, OrderService,
    RatingService, UserService,
};

use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let server_config = state.config.server.clone();

    build_router(state)
        .layer(DefaultBodyLimit::max(server_config.max_body_bytes))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&server_config.cors))
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
}

/// Runs the UrPearl SHOP server with the given configuration and
/// database pool. Blocks until shutdown.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    tracing::info!("Starting UrPearl SHOP server...");

    // ── Step 1: Initialize repositories ──────────────────────────
    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let category_repo = Arc::new(CategoryRepository::new(db_pool.clone()));
    let product_repo = Arc::new(ProductRepository::new(db_pool.clone()));
    let inventory_repo = Arc::new(InventoryRepository::new(db_pool.clone()));
    let cart_repo = Arc::new(CartRepository::new(db_pool.clone()));
    let order_repo = Arc::new(OrderRepository::new(db_pool.clone()));
    let rating_repo = Arc::new(RatingRepository::new(db_pool.clone()));
    let notification_repo = Arc::new(NotificationRepository::new(db_pool.clone()));

    // ── Step 2: Initialize auth system ───────────────────────────
    let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

    // ── Step 3: Select payment provider ──────────────────────────
    tracing::info!(provider = %config.payment.provider, "Initializing payment provider");
    let payments = build_payment_provider(&config.payment)?;

    // ── Step 4: Initialize services ──────────────────────────────
    let notification_service = Arc::new(NotificationService::new(
        Arc::clone(&notification_repo),
        Arc::clone(&user_repo),
    ));
    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_repo),
        Arc::clone(&jwt_encoder),
    ));
    let catalog_service = Arc::new(CatalogService::new(
        db_pool.clone(),
        Arc::clone(&product_repo),
        Arc::clone(&category_repo),
        Arc::clone(&inventory_repo),
    ));
    let cart_service = Arc::new(CartService::new(
        Arc::clone(&cart_repo),
        Arc::clone(&product_repo),
        Arc::clone(&inventory_repo),
    ));
    let inventory_service = Arc::new(InventoryService::new(
        Arc::clone(&inventory_repo),
        Arc::clone(&product_repo),
        Arc::clone(&notification_service),
    ));
    let order_service = Arc::new(OrderService::new(
        db_pool.clone(),
        Arc::clone(&order_repo),
        Arc::clone(&cart_repo),
        Arc::clone(&inventory_repo),
        Arc::clone(&product_repo),
        Arc::clone(&notification_service),
        Arc::clone(&payments),
        config.payment.currency.clone(),
    ));
    let rating_service = Arc::new(RatingService::new(
        Arc::clone(&rating_repo),
        Arc::clone(&product_repo),
        Arc::clone(&order_repo),
    ));

    // ── Step 5: Build application state ──────────────────────────
    let state = AppState {
        config: Arc::new(config.clone()),
        db_pool: db_pool.clone(),
        jwt_decoder,
        user_service,
        catalog_service,
        cart_service,
        inventory_service,
        order_service,
        rating_service,
        notification_service,
    };

    // ── Step 6: Start HTTP server ────────────────────────────────
    let app = build_app(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("UrPearl SHOP server listening on {}", addr);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, draining connections");
        let _ = shutdown_tx.send(true);
    });

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    tokio::select! {
        result = server => {
            result.map_err(|e| AppError::internal(format!("Server error: {}", e)))?;
        }
        _ = async {
            let _ = shutdown_rx.changed().await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(
                grace_seconds = grace.as_secs(),
                "Grace period expired before all connections drained"
            );
        }
    }

    Ok(())
}

/// Instantiates the payment provider named in configuration.
fn build_payment_provider(config: &PaymentConfig) -> AppResult<Arc<dyn PaymentProvider>> {
    match config.provider.as_str() {
        "mock" => Ok(Arc::new(MockPaymentProvider::new())),
        "stripe" => Ok(Arc::new(StripeProvider::new(config)?)),
        other => Err(AppError::configuration(format!(
            "Unknown payment provider '{other}'"
        ))),
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
}
