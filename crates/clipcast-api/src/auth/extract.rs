//! Authenticated caller context, extracted from the Authorization header.
//!
//! Implemented as an extractor (not middleware populating extensions) so it
//! composes with Multipart and the handlers declare exactly the auth they
//! need in their signatures.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use clipcast_core::models::Role;
use clipcast_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

/// Verified caller identity and role.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub account_id: Uuid,
    pub role: Role,
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthenticated("Missing authorization header".to_string()))?;

    header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthenticated("Invalid authorization header format".to_string())
    })
}

impl FromRequestParts<Arc<AppState>> for AuthContext {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = crate::auth::verify_token(&state.config.jwt_secret, token)?;

        Ok(AuthContext {
            account_id: claims.sub,
            role: claims.role,
        })
    }
}
