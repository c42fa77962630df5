//! Product rating handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use urpearl_core::error::AppError;
use urpearl_entity::Rating;
use urpearl_service::ProductRatingsView;

use crate::dto::request::{CreateRatingRequest, UpdateRatingRequest, validated};
use crate::dto::response::ApiResponse;
use crate::extractors::path::parse_uuid;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/products/{slug}/ratings
pub async fn list_product_ratings(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<ProductRatingsView>>, AppError> {
    let product = state.catalog_service.get_product_by_slug(&slug).await?;
    let ratings = state
        .rating_service
        .list_for_product(product.id, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok("Ratings retrieved", ratings)))
}

/// POST /api/products/{id}/ratings
pub async fn create_rating(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<CreateRatingRequest>,
) -> Result<Json<ApiResponse<Rating>>, AppError> {
    let product_id = parse_uuid(&id)?;
    let req = validated(req)?;
    let rating = state
        .rating_service
        .create_rating(&auth, product_id, req.rating, req.review.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok("Review submitted", rating)))
}

/// PUT /api/ratings/{id}
pub async fn update_rating(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateRatingRequest>,
) -> Result<Json<ApiResponse<Rating>>, AppError> {
    let rating_id = parse_uuid(&id)?;
    let req = validated(req)?;
    let rating = state
        .rating_service
        .update_rating(&auth, rating_id, req.rating, req.review.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok("Review updated", rating)))
}

/// DELETE /api/ratings/{id}
pub async fn delete_rating(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let rating_id = parse_uuid(&id)?;
    state.rating_service.delete_rating(&auth, rating_id).await?;
    Ok(Json(ApiResponse::ok("Review deleted", ())))
}
