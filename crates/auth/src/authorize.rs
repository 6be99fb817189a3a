use serde::Serialize;
use thiserror::Error;

use crate::Role;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: role '{0}' is not allowed")]
    Forbidden(Role),
}

/// Fixed set of roles a route admits.
///
/// Built once at route registration. Membership is exact: listing `Admin`
/// says nothing about `Teacher`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleAllowList {
    roles: Vec<Role>,
}

impl RoleAllowList {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        let mut list = Vec::new();
        for role in roles {
            if !list.contains(&role) {
                list.push(role);
            }
        }
        Self { roles: list }
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn permits(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

impl<const N: usize> From<[Role; N]> for RoleAllowList {
    fn from(roles: [Role; N]) -> Self {
        Self::new(roles)
    }
}

/// Authorize a caller's role against a route's allow-list.
///
/// - No IO
/// - No panics
pub fn authorize(role: Role, allowed: &RoleAllowList) -> Result<(), AuthzError> {
    if allowed.permits(role) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(role))
    }
}
