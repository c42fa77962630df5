//! Admin product management handlers.

use axum::Json;
use axum::extract::{Path, State};

use urpearl_core::error::AppError;
use urpearl_entity::{Product, UpdateProduct};

use crate::dto::request::{CreateProductRequest, validated};
use crate::dto::response::ApiResponse;
use crate::extractors::AuthUser;
use crate::extractors::path::parse_uuid;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// POST /api/admin/products
pub async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateProductRequest>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    require_admin(&auth)?;
    let req = validated(req)?;
    let product = state
        .catalog_service
        .create_product(&auth, req.into_new_product())
        .await?;
    Ok(Json(ApiResponse::ok("Product created", product)))
}

/// PUT /api/admin/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(patch): Json<UpdateProduct>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    require_admin(&auth)?;
    let product_id = parse_uuid(&id)?;
    let product = state
        .catalog_service
        .update_product(&auth, product_id, patch)
        .await?;
    Ok(Json(ApiResponse::ok("Product updated", product)))
}

/// DELETE /api/admin/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    require_admin(&auth)?;
    let product_id = parse_uuid(&id)?;
    state
        .catalog_service
        .delete_product(&auth, product_id)
        .await?;
    Ok(Json(ApiResponse::ok("Product deleted", ())))
}
