//! Buyer order handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use urpearl_core::error::AppError;
use urpearl_core::types::PageResponse;
use urpearl_entity::Order;
use urpearl_service::OrderView;

use crate::dto::response::ApiResponse;
use crate::extractors::path::parse_uuid;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/orders
pub async fn list_orders(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<Order>>>, AppError> {
    let orders = state
        .order_service
        .list_orders(&auth, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok("Orders retrieved", orders)))
}

/// GET /api/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<OrderView>>, AppError> {
    let order_id = parse_uuid(&id)?;
    let order = state.order_service.get_order(&auth, order_id).await?;
    Ok(Json(ApiResponse::ok("Order retrieved", order)))
}

/// POST /api/orders/{id}/cancel
pub async fn cancel_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<OrderView>>, AppError> {
    let order_id = parse_uuid(&id)?;
    let order = state.order_service.cancel_order(&auth, order_id).await?;
    Ok(Json(ApiResponse::ok("Order cancelled", order)))
}
