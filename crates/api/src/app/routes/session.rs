//! Login and current-user endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};

use crate::app::dto::{CurrentUserResponse, LoginRequest, LoginResponse, UserView};
use crate::app::errors::ApiError;
use crate::app::services::AuthServices;
use crate::context::AuthContext;

/// POST /api/login - Exchange username + password for a session token
pub async fn login(
    Extension(services): Extension<Arc<AuthServices>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| {
        tracing::debug!(reason = %e, "unreadable login body");
        ApiError::BadRequest("invalid request format".to_string())
    })?;

    if req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "username and password are required".to_string(),
        ));
    }

    let record = services
        .users
        .find_by_username(&req.username)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    // Unknown users are checked against the decoy digest so the response
    // time does not reveal whether the account exists.
    let digest = record
        .as_ref()
        .map(|u| u.password_digest.clone())
        .unwrap_or_else(|| services.decoy_digest.clone());

    let credentials = Arc::clone(&services.credentials);
    let password = req.password;
    let matched = tokio::task::spawn_blocking(move || credentials.verify(&password, &digest))
        .await
        .map_err(|e| ApiError::Internal(format!("credential check aborted: {e}")))?;

    let user = match record {
        Some(user) if matched => user,
        _ => {
            tracing::debug!(username = %req.username, "login rejected");
            return Err(ApiError::InvalidCredentials);
        }
    };

    let token = services
        .tokens
        .issue(user.id, user.role)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(user_id = %user.id, role = %user.role, "login succeeded");

    Ok(Json(LoginResponse {
        token,
        user: UserView::from(&user),
    }))
}

/// GET /api/user - Identity of the caller as carried by their token
pub async fn current_user(Extension(ctx): Extension<AuthContext>) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse {
        user_id: ctx.user_id(),
        role: ctx.role(),
    })
}
