//! User roles for access control.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use urpearl_core::AppError;

/// Access level granted to a user account.
///
/// Every account is a [`Role::Buyer`] unless promoted; only admins can
/// reach the back-office surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access to catalog management, inventory and order administration.
    Admin,
    /// Regular shopper: browse, cart, checkout, rate purchased products.
    Buyer,
}

impl Role {
    /// Stable string form used in JWT claims and API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Buyer => "buyer",
        }
    }

    /// Whether this role grants access to admin-only routes.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Buyer
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "buyer" => Ok(Role::Buyer),
            other => Err(AppError::validation(format!("Unknown role: {other}"))),
        }
    }
}
