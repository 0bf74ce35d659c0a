//! JWT authentication middleware and role guards.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::{CurrentUser, UserAccess};
use crate::errors::AppError;

/// Roles that manage stores, addresses and demands
pub const STORE_ROLES: &[UserAccess] = &[UserAccess::Admin, UserAccess::StoreOwner];

pub const ADMIN_ONLY: &[UserAccess] = &[UserAccess::Admin];

/// JWT authentication middleware.
///
/// Extracts the bearer token, resolves it to an active user and injects
/// the [`CurrentUser`] into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let current_user = state.auth_service.authenticate(token).await?;
    tracing::debug!(user_id = %current_user.id, access = %current_user.access, "Request authenticated");

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Allow the request only when the user's access level is in `allowed`.
pub fn require_access(user: &CurrentUser, allowed: &[UserAccess]) -> Result<(), AppError> {
    if allowed.contains(&user.access) {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.id, access = %user.access, "Access level not allowed");
        Err(AppError::forbidden("User does not have access to this resource"))
    }
}

/// Require admin access, returns Forbidden otherwise.
pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    require_access(user, ADMIN_ONLY)
}
