//! Public catalog handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use urpearl_core::error::AppError;
use urpearl_core::types::PageResponse;
use urpearl_entity::ProductSummary;

use crate::dto::request::ProductListParams;
use crate::dto::response::ApiResponse;
use crate::state::AppState;

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> Result<Json<ApiResponse<PageResponse<ProductSummary>>>, AppError> {
    let (filter, page) = params.into_parts();
    let products = state.catalog_service.list_products(&filter, &page).await?;
    Ok(Json(ApiResponse::ok("Products retrieved", products)))
}

/// GET /api/products/{slug}
pub async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<ProductSummary>>, AppError> {
    let product = state.catalog_service.get_product_by_slug(&slug).await?;
    Ok(Json(ApiResponse::ok("Product retrieved", product)))
}
