//! Auth handlers: OAuth sign-in and current user.

use axum::Json;
use axum::extract::State;

use urpearl_core::error::AppError;
use urpearl_entity::User;

use crate::dto::request::{OAuthSignInRequest, validated};
use crate::dto::response::{ApiResponse, AuthResponse};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/oauth
pub async fn oauth_sign_in(
    State(state): State<AppState>,
    Json(req): Json<OAuthSignInRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let req = validated(req)?;
    let (user, token) = state.user_service.oauth_sign_in(&req.into_upsert()).await?;

    Ok(Json(ApiResponse::ok(
        "Signed in",
        AuthResponse {
            user,
            access_token: token.access_token,
            expires_at: token.expires_at,
        },
    )))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = state.user_service.get_me(&auth).await?;
    Ok(Json(ApiResponse::ok("Current user", user)))
}
