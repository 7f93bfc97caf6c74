//! Authorization checks consulted by handlers after the access guard has run.

use crate::database::models::Role;
use crate::errors::{ServiceError, ServiceResult};
use crate::utils::jwt::Claims;

/// Passes only when the caller holds `role`.
pub fn require_role(claims: &Claims, role: Role) -> ServiceResult<()> {
    if claims.has_role(role) {
        return Ok(());
    }

    tracing::warn!(
        user_id = %claims.user_id(),
        role = %claims.role(),
        required = %role,
        "Role check denied"
    );
    Err(ServiceError::permission_denied(
        "unauthorised to access this resource",
    ))
}

/// Passes when the caller owns `requested_user_id`, otherwise falls back to [`require_role`].
pub fn require_self_or_role(
    claims: &Claims,
    requested_user_id: &str,
    role: Role,
) -> ServiceResult<()> {
    if claims.user_id() == requested_user_id {
        return Ok(());
    }
    require_role(claims, role)
}
