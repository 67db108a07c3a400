//! Capability checks.
//!
//! Every role/ownership decision in the API goes through this module so the
//! rules live in one place instead of inline in each handler.

use crate::auth::AuthContext;
use clipcast_core::models::Role;
use clipcast_core::AppError;
use uuid::Uuid;

/// The caller's role must be in the operation's allowed set.
pub fn require_role(ctx: &AuthContext, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&ctx.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "role {} may not perform this operation",
            ctx.role
        )))
    }
}

/// The caller must own the resource or be an administrator.
pub fn require_owner_or_admin(ctx: &AuthContext, owner_id: Uuid) -> Result<(), AppError> {
    if ctx.role == Role::Admin || ctx.account_id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "you can only modify your own content".to_string(),
        ))
    }
}
