//! User provisioning from verified OAuth identities.

use std::sync::Arc;

use tracing::info;

use urpearl_auth::jwt::encoder::IssuedToken;
use urpearl_auth::JwtEncoder;
use urpearl_core::result::AppResult;
use urpearl_core::AppError;
use urpearl_database::repositories::UserRepository;
use urpearl_entity::user::{UpsertUser, User};

use crate::context::RequestContext;

/// Finds or creates accounts from verified provider identities and
/// mints their bearer tokens.
#[derive(Debug, Clone)]
pub struct UserService {
    user_repo: Arc<UserRepository>,
    encoder: Arc<JwtEncoder>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(user_repo: Arc<UserRepository>, encoder: Arc<JwtEncoder>) -> Self {
        Self { user_repo, encoder }
    }

    /// Sign a user in from an identity the OAuth boundary has already
    /// verified. New accounts get the buyer role; returning accounts
    /// have their profile fields refreshed.
    pub async fn oauth_sign_in(&self, identity: &UpsertUser) -> AppResult<(User, IssuedToken)> {
        if identity.provider.trim().is_empty() || identity.provider_id.trim().is_empty() {
            return Err(AppError::validation("Provider identity is required"));
        }
        if identity.email.trim().is_empty() {
            return Err(AppError::validation("Email is required"));
        }

        let user = self.user_repo.upsert(identity).await?;
        let token = self.encoder.issue_token(&user)?;

        info!(
            user_id = %user.id,
            provider = %user.provider,
            role = %user.role,
            "User signed in"
        );
        Ok((user, token))
    }

    /// Load the acting user's stored profile.
    pub async fn get_me(&self, ctx: &RequestContext) -> AppResult<User> {
        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User account no longer exists"))
    }
}
