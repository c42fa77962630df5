//! Admin notification handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use urpearl_core::error::AppError;
use urpearl_entity::Notification;

use crate::dto::request::NotificationListParams;
use crate::dto::response::{ApiResponse, CountResponse, NotificationListResponse};
use crate::extractors::AuthUser;
use crate::extractors::path::parse_uuid;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/admin/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<NotificationListParams>,
) -> Result<Json<ApiResponse<NotificationListResponse>>, AppError> {
    require_admin(&auth)?;
    let notifications = state
        .notification_service
        .list_for_admin(&auth, params.unread_only, &params.page_request())
        .await?;
    let unread_count = state.notification_service.unread_count(&auth).await?;
    Ok(Json(ApiResponse::ok(
        "Notifications retrieved",
        NotificationListResponse {
            unread_count,
            notifications,
        },
    )))
}

/// POST /api/admin/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Notification>>, AppError> {
    require_admin(&auth)?;
    let notification_id = parse_uuid(&id)?;
    let notification = state
        .notification_service
        .mark_read(&auth, notification_id)
        .await?;
    Ok(Json(ApiResponse::ok(
        "Notification marked as read",
        notification,
    )))
}

/// POST /api/admin/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, AppError> {
    require_admin(&auth)?;
    let count = state.notification_service.mark_all_read(&auth).await?;
    Ok(Json(ApiResponse::ok(
        "All notifications marked as read",
        CountResponse { count },
    )))
}
