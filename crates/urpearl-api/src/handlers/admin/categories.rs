//! Admin category management handlers.

use axum::Json;
use axum::extract::{Path, State};

use urpearl_core::error::AppError;
use urpearl_entity::Category;

use crate::dto::request::{CategoryRequest, validated};
use crate::dto::response::ApiResponse;
use crate::extractors::AuthUser;
use crate::extractors::path::parse_uuid;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// POST /api/admin/categories
pub async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CategoryRequest>,
) -> Result<Json<ApiResponse<Category>>, AppError> {
    require_admin(&auth)?;
    let req = validated(req)?;
    let category = state
        .catalog_service
        .create_category(&auth, &req.name, req.slug.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok("Category created", category)))
}

/// PUT /api/admin/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<CategoryRequest>,
) -> Result<Json<ApiResponse<Category>>, AppError> {
    require_admin(&auth)?;
    let category_id = parse_uuid(&id)?;
    let req = validated(req)?;
    let category = state
        .catalog_service
        .update_category(&auth, category_id, &req.name, req.slug.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok("Category updated", category)))
}

/// DELETE /api/admin/categories/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    require_admin(&auth)?;
    let category_id = parse_uuid(&id)?;
    state
        .catalog_service
        .delete_category(&auth, category_id)
        .await?;
    Ok(Json(ApiResponse::ok("Category deleted", ())))
}
