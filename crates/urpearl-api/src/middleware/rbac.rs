//! RBAC helpers for role-based route guarding.

use urpearl_core::error::AppError;

use crate::extractors::AuthUser;

/// Checks that the authenticated user has the Admin role.
///
/// Admin handlers call this before touching the service layer so the
/// rejection happens up front; services enforce the same rule again.
pub fn require_admin(auth: &AuthUser) -> Result<(), AppError> {
    if !auth.is_admin() {
        return Err(AppError::forbidden("Admin access required"));
    }
    Ok(())
}
