//! Route-level role gate.
//!
//! Routes declare a fixed [`RoleAllowList`] at registration time:
//!
//! ```ignore
//! router.route_layer(axum::middleware::from_fn_with_state(
//!     RoleGate::new([Role::Admin, Role::Academic]),
//!     authz::role_gate,
//! ))
//! ```
//!
//! The gate must sit inside the auth middleware, which supplies the
//! [`AuthContext`] it checks.
//!
//! This crate only serves login and the current-user endpoint, which any
//! authenticated role may call, so nothing here registers a gate itself. The
//! per-route allow-lists belong to the routers that mount the academic
//! resources (students, courses, grades, departments) on top of
//! [`crate::app::build_app`]'s auth stack. `tests/role_gate.rs` wires gates the
//! same way those routers do.

use std::sync::Arc;

use axum::{extract::State, middleware::Next, response::Response};

use campus_auth::{Role, RoleAllowList, authorize};

use crate::app::errors::ApiError;
use crate::context::AuthContext;

#[derive(Debug, Clone)]
pub struct RoleGate {
    allowed: Arc<RoleAllowList>,
}

impl RoleGate {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed: Arc::new(RoleAllowList::new(roles)),
        }
    }

    pub fn allowed(&self) -> &RoleAllowList {
        &self.allowed
    }
}

/// Reject callers whose role is not in the gate's allow-list.
pub async fn role_gate(
    State(gate): State<RoleGate>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx = req
        .extensions()
        .get::<AuthContext>()
        .copied()
        .ok_or(ApiError::Unauthorized)?;

    authorize(ctx.role(), gate.allowed()).map_err(|e| {
        tracing::debug!(user_id = %ctx.user_id(), reason = %e, "role gate denied request");
        ApiError::Forbidden
    })?;

    Ok(next.run(req).await)
}
