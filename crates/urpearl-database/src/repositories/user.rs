//! User repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use urpearl_core::result::AppResult;
use urpearl_core::{AppError, ErrorKind};
use urpearl_entity::user::{Role, UpsertUser, User};

/// Repository for user lookup and OAuth provisioning.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// Find a user by their identity provider pair.
    pub async fn find_by_provider_identity(
        &self,
        provider: &str,
        provider_id: &str,
    ) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE provider = $1 AND provider_id = $2",
        )
        .bind(provider)
        .bind(provider_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find user by provider", e)
        })
    }

    /// Find or create a user from a verified provider identity.
    ///
    /// New accounts are created with the buyer role; on repeat sign-in
    /// the stored profile fields are refreshed but the role is kept.
    pub async fn upsert(&self, data: &UpsertUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, avatar_url, role, provider, provider_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (provider, provider_id) DO UPDATE \
               SET name = EXCLUDED.name, \
                   email = EXCLUDED.email, \
                   avatar_url = EXCLUDED.avatar_url, \
                   updated_at = NOW() \
             RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.avatar_url)
        .bind(Role::Buyer)
        .bind(&data.provider)
        .bind(&data.provider_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_email_key") => {
                AppError::conflict(format!(
                    "Email '{}' is already linked to another account",
                    data.email
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to upsert user", e),
        })
    }

    /// Update a user's role.
    pub async fn update_role(&self, user_id: Uuid, role: Role) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update role", e))?
        .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }

    /// List the IDs of all admin accounts, for notification fan-out.
    pub async fn find_admin_ids(&self) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE role = $1")
            .bind(Role::Admin)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list admins", e))
    }
}
