use campus_auth::{IdentityClaim, Role, SubjectId};

/// Authenticated caller for a request (subject id + role).
///
/// Inserted into request extensions by the auth middleware; handlers read it
/// via `Extension<AuthContext>`. It is the only source of caller identity.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AuthContext {
    user_id: SubjectId,
    role: Role,
}

impl AuthContext {
    pub fn new(user_id: SubjectId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn user_id(&self) -> SubjectId {
        self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

impl From<&IdentityClaim> for AuthContext {
    fn from(claims: &IdentityClaim) -> Self {
        Self::new(claims.subject_id, claims.role)
    }
}
