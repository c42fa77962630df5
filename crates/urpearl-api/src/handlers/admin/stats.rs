//! Admin dashboard statistics handler.

use axum::Json;
use axum::extract::State;

use urpearl_core::error::AppError;

use crate::dto::response::{ApiResponse, DashboardStats};
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/admin/stats
pub async fn dashboard_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    require_admin(&auth)?;
    let orders = state.order_service.get_order_stats(&auth).await?;
    let inventory = state.inventory_service.get_inventory_stats(&auth).await?;
    Ok(Json(ApiResponse::ok(
        "Dashboard statistics retrieved",
        DashboardStats { orders, inventory },
    )))
}
