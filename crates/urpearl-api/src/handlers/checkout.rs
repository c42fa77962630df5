//! Checkout handlers: payment intent creation and order placement.

use axum::Json;
use axum::extract::State;

use urpearl_core::error::AppError;
use urpearl_service::{CheckoutIntentView, OrderView};

use crate::dto::request::{CheckoutRequest, validated};
use crate::dto::response::ApiResponse;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/checkout/intent
pub async fn create_intent(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CheckoutIntentView>>, AppError> {
    let intent = state.order_service.create_checkout_intent(&auth).await?;
    Ok(Json(ApiResponse::ok("Checkout intent created", intent)))
}

/// POST /api/checkout
pub async fn checkout(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<ApiResponse<OrderView>>, AppError> {
    let req = validated(req)?;
    let address = req.shipping_address.into_address();
    let order = state
        .order_service
        .checkout(&auth, &req.payment_intent_id, &address)
        .await?;
    Ok(Json(ApiResponse::ok("Order placed", order)))
}
