//! Admin order management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use urpearl_core::error::AppError;
use urpearl_core::types::PageResponse;
use urpearl_entity::Order;
use urpearl_service::OrderView;

use crate::dto::request::{CreateOrderRequest, OrderListParams, UpdateOrderStatusRequest, validated};
use crate::dto::response::ApiResponse;
use crate::extractors::AuthUser;
use crate::extractors::path::parse_uuid;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/admin/orders
pub async fn list_orders(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<OrderListParams>,
) -> Result<Json<ApiResponse<PageResponse<Order>>>, AppError> {
    require_admin(&auth)?;
    let orders = state
        .order_service
        .list_all_orders(&auth, params.status, &params.page_request())
        .await?;
    Ok(Json(ApiResponse::ok("Orders retrieved", orders)))
}

/// POST /api/admin/orders
pub async fn create_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<ApiResponse<OrderView>>, AppError> {
    require_admin(&auth)?;
    let req = validated(req)?;
    let address = req.shipping_address.into_address();
    let order = state
        .order_service
        .create_order(&auth, req.user_id, &req.items, &address)
        .await?;
    Ok(Json(ApiResponse::ok("Order created", order)))
}

/// PUT /api/admin/orders/{id}/status
pub async fn update_order_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> Result<Json<ApiResponse<OrderView>>, AppError> {
    require_admin(&auth)?;
    let order_id = parse_uuid(&id)?;
    let order = state
        .order_service
        .update_order_status(&auth, order_id, req.status)
        .await?;
    Ok(Json(ApiResponse::ok("Order status updated", order)))
}
