use axum::{
    routing::{get, post},
    Router,
};

pub mod session;
pub mod system;

/// Endpoints reachable without a token.
pub fn public_router() -> Router {
    Router::new().route("/login", post(session::login))
}

/// Endpoints behind the auth middleware.
pub fn protected_router() -> Router {
    Router::new().route("/user", get(session::current_user))
}
