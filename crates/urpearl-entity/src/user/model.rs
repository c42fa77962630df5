//! User account model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Role;

/// A shopper or administrator account.
///
/// Accounts are provisioned through the OAuth boundary: identity
/// verification happens upstream, so this model only records the
/// provider identity pair that uniquely names the account.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Profile image URL from the identity provider, if any.
    pub avatar_url: Option<String>,
    pub role: Role,
    /// Identity provider name, e.g. `google`.
    pub provider: String,
    /// Stable subject identifier issued by the provider.
    pub provider_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Verified identity fields used to find-or-create a [`User`].
///
/// The `(provider, provider_id)` pair is the lookup key; profile fields
/// refresh the stored copy on every sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertUser {
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub provider: String,
    pub provider_id: String,
}
