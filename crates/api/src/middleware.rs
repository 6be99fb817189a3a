use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use campus_auth::TokenVerifier;

use crate::app::errors::ApiError;
use crate::context::AuthContext;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<dyn TokenVerifier>,
}

/// Require a valid bearer token and attach the caller's [`AuthContext`].
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())?;

    let claims = state.tokens.verify_at(token, Utc::now()).map_err(|e| {
        tracing::debug!(reason = %e, "rejected bearer token");
        ApiError::Unauthorized
    })?;

    req.extensions_mut().insert(AuthContext::from(&claims));

    Ok(next.run(req).await)
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// The scheme is matched case-sensitively with exactly one space.
fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(ApiError::Unauthorized)?;

    let header = header.to_str().map_err(|_| ApiError::Unauthorized)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    if token.is_empty() || token.starts_with(' ') {
        return Err(ApiError::Unauthorized);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static(value),
        );
        h
    }

    #[test]
    fn accepts_exact_bearer_scheme() {
        let h = headers("Bearer abc.def.ghi");
        assert_eq!(extract_bearer(&h).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn rejects_missing_header() {
        assert!(matches!(
            extract_bearer(&HeaderMap::new()),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn rejects_other_schemes_and_spacing() {
        for value in [
            "bearer abc",
            "BEARER abc",
            "Basic abc",
            "Bearerabc",
            "Bearer  abc",
            "Bearer ",
            "abc",
        ] {
            assert!(
                matches!(extract_bearer(&headers(value)), Err(ApiError::Unauthorized)),
                "{value:?}"
            );
        }
    }
}
