//! Account registration, login, and administration.

use crate::auth::{issue_token, AuthContext};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use clipcast_core::models::{AccountResponse, Role};
use clipcast_core::AppError;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

const BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Defaults to `viewer` when omitted.
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, serde::Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub account: AccountResponse,
}

#[utoipa::path(
    post,
    path = "/api/v0/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid registration payload", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), HttpAppError> {
    if payload.username.trim().is_empty() || payload.email.trim().is_empty() {
        return Err(AppError::InvalidInput("Username and email are required".to_string()).into());
    }
    if payload.password.len() < 8 {
        return Err(
            AppError::InvalidInput("Password must be at least 8 characters".to_string()).into(),
        );
    }

    // bcrypt is CPU-bound; keep it off the async workers.
    let password = payload.password;
    let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    let account = state
        .accounts
        .create(
            payload.username,
            payload.email,
            password_hash,
            payload.role.unwrap_or(Role::Viewer),
        )
        .await?;

    tracing::info!(account_id = %account.id, role = %account.role, "Account registered");

    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

#[utoipa::path(
    post,
    path = "/api/v0/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Unknown email or wrong password", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpAppError> {
    // Same response for unknown email and wrong password.
    let invalid = || AppError::Unauthenticated("Invalid email or password".to_string());

    let account = state
        .accounts
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(invalid)?;

    let password = payload.password;
    let hash = account.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))?;

    if !verified {
        return Err(invalid().into());
    }

    let token = issue_token(
        &state.config.jwt_secret,
        account.id,
        account.role,
        state.config.jwt_expiry_hours,
    )?;

    tracing::debug!(account_id = %account.id, "Login succeeded");

    Ok(Json(LoginResponse {
        token,
        account: AccountResponse::from(account),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v0/auth/users",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All accounts", body = Vec<AccountResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    )
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
) -> Result<Json<Vec<AccountResponse>>, HttpAppError> {
    crate::policy::require_role(&ctx, &[Role::Admin])?;
    let accounts = state.accounts.list().await?;
    Ok(Json(
        accounts.into_iter().map(AccountResponse::from).collect(),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v0/auth/users/{id}",
    tag = "auth",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "No such account", body = ErrorResponse)
    )
)]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, HttpAppError> {
    crate::policy::require_role(&ctx, &[Role::Admin])?;

    if !state.accounts.delete(id).await? {
        return Err(AppError::NotFound(format!("account {} not found", id)).into());
    }

    tracing::info!(account_id = %id, admin_id = %ctx.account_id, "Account deleted");

    Ok(Json(json!({ "message": "Account deleted" })))
}
