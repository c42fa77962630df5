//! Admin inventory handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use urpearl_core::error::AppError;
use urpearl_core::types::PageResponse;
use urpearl_database::repositories::LowStockRow;
use urpearl_entity::{Inventory, ProductSummary};
use urpearl_service::BulkInventoryOutcome;

use crate::dto::request::{
    AdjustStockRequest, BulkInventoryRequest, UpdateStockRequest, UpdateThresholdRequest, validated,
};
use crate::dto::response::ApiResponse;
use crate::extractors::path::parse_uuid;
use crate::extractors::{AuthUser, PaginationParams};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/admin/inventory
pub async fn list_inventory(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<ProductSummary>>>, AppError> {
    require_admin(&auth)?;
    let inventory = state
        .inventory_service
        .list_inventory(&auth, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok("Inventory retrieved", inventory)))
}

/// GET /api/admin/inventory/low-stock
pub async fn list_low_stock(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<LowStockRow>>>, AppError> {
    require_admin(&auth)?;
    let rows = state.inventory_service.get_low_stock_products(&auth).await?;
    Ok(Json(ApiResponse::ok("Low stock products retrieved", rows)))
}

/// PUT /api/admin/inventory/{product_id}
pub async fn update_stock(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(product_id): Path<String>,
    Json(req): Json<UpdateStockRequest>,
) -> Result<Json<ApiResponse<Inventory>>, AppError> {
    require_admin(&auth)?;
    let product_id = parse_uuid(&product_id)?;
    let req = validated(req)?;
    let inventory = state
        .inventory_service
        .update_stock(&auth, product_id, req.quantity)
        .await?;
    Ok(Json(ApiResponse::ok("Stock updated", inventory)))
}

/// POST /api/admin/inventory/{product_id}/adjust
pub async fn adjust_stock(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(product_id): Path<String>,
    Json(req): Json<AdjustStockRequest>,
) -> Result<Json<ApiResponse<Inventory>>, AppError> {
    require_admin(&auth)?;
    let product_id = parse_uuid(&product_id)?;
    if req.delta == 0 {
        return Err(AppError::validation("Delta must not be zero"));
    }

    let inventory = if req.delta > 0 {
        state
            .inventory_service
            .increment_stock(&auth, product_id, req.delta)
            .await?
    } else {
        state
            .inventory_service
            .decrement_stock(&auth, product_id, req.delta.saturating_abs())
            .await?
    };
    Ok(Json(ApiResponse::ok("Stock adjusted", inventory)))
}

/// PUT /api/admin/inventory/{product_id}/threshold
pub async fn update_threshold(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(product_id): Path<String>,
    Json(req): Json<UpdateThresholdRequest>,
) -> Result<Json<ApiResponse<Inventory>>, AppError> {
    require_admin(&auth)?;
    let product_id = parse_uuid(&product_id)?;
    let req = validated(req)?;
    let inventory = state
        .inventory_service
        .update_low_stock_threshold(&auth, product_id, req.low_stock_threshold)
        .await?;
    Ok(Json(ApiResponse::ok("Threshold updated", inventory)))
}

/// POST /api/admin/inventory/bulk
pub async fn bulk_update(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<BulkInventoryRequest>,
) -> Result<Json<ApiResponse<Vec<BulkInventoryOutcome>>>, AppError> {
    require_admin(&auth)?;
    let req = validated(req)?;
    let outcomes = state
        .inventory_service
        .bulk_update_inventory(&auth, &req.into_updates())
        .await?;
    Ok(Json(ApiResponse::ok("Bulk update applied", outcomes)))
}
