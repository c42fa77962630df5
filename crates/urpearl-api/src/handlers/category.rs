//! Public category handlers.

use axum::Json;
use axum::extract::State;

use urpearl_core::error::AppError;
use urpearl_entity::Category;

use crate::dto::response::ApiResponse;
use crate::state::AppState;

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Category>>>, AppError> {
    let categories = state.catalog_service.list_categories().await?;
    Ok(Json(ApiResponse::ok("Categories retrieved", categories)))
}
