//! Cart handlers.

use axum::Json;
use axum::extract::{Path, State};

use urpearl_core::error::AppError;
use urpearl_entity::CartItem;
use urpearl_service::CartView;

use crate::dto::request::{AddToCartRequest, UpdateCartItemRequest, validated};
use crate::dto::response::{ApiResponse, CartSummaryResponse, CartValidationResponse, CountResponse};
use crate::extractors::AuthUser;
use crate::extractors::path::parse_uuid;
use crate::state::AppState;

/// GET /api/cart
pub async fn get_cart(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CartView>>, AppError> {
    let cart = state.cart_service.get_cart(&auth).await?;
    Ok(Json(ApiResponse::ok("Cart retrieved", cart)))
}

/// DELETE /api/cart
pub async fn clear_cart(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, AppError> {
    let removed = state.cart_service.clear_cart(&auth).await?;
    Ok(Json(ApiResponse::ok(
        "Cart cleared",
        CountResponse { count: removed },
    )))
}

/// POST /api/cart/items
pub async fn add_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<AddToCartRequest>,
) -> Result<Json<ApiResponse<CartItem>>, AppError> {
    let req = validated(req)?;
    let item = state
        .cart_service
        .add_to_cart(&auth, req.product_id, req.quantity)
        .await?;
    Ok(Json(ApiResponse::ok("Item added to cart", item)))
}

/// PUT /api/cart/items/{id}
pub async fn update_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateCartItemRequest>,
) -> Result<Json<ApiResponse<Option<CartItem>>>, AppError> {
    let cart_item_id = parse_uuid(&id)?;
    let item = state
        .cart_service
        .update_quantity(&auth, cart_item_id, req.quantity)
        .await?;

    let message = if item.is_some() {
        "Cart item updated"
    } else {
        "Item removed from cart"
    };
    Ok(Json(ApiResponse::ok(message, item)))
}

/// DELETE /api/cart/items/{id}
pub async fn remove_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let cart_item_id = parse_uuid(&id)?;
    state
        .cart_service
        .remove_from_cart(&auth, cart_item_id)
        .await?;
    Ok(Json(ApiResponse::ok("Item removed from cart", ())))
}

/// GET /api/cart/summary
pub async fn cart_summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CartSummaryResponse>>, AppError> {
    let item_count = state.cart_service.get_cart_item_count(&auth).await?;
    let total = state.cart_service.get_cart_total(&auth).await?;
    Ok(Json(ApiResponse::ok(
        "Cart summary",
        CartSummaryResponse { item_count, total },
    )))
}

/// GET /api/cart/validate
pub async fn validate_cart(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CartValidationResponse>>, AppError> {
    let problems = state.cart_service.validate_cart_stock(&auth).await?;
    Ok(Json(ApiResponse::ok(
        "Cart validated",
        CartValidationResponse {
            valid: problems.is_empty(),
            problems,
        },
    )))
}
