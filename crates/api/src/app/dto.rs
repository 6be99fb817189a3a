use serde::{Deserialize, Serialize};

use campus_auth::{Role, SubjectId};

use crate::directory::UserRecord;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserView,
}

/// Public projection of a user row. Never carries the password digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: SubjectId,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub email: String,
    pub phone: String,
}

impl From<&UserRecord> for UserView {
    fn from(u: &UserRecord) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            name: u.name.clone(),
            role: u.role,
            email: u.email.clone(),
            phone: u.phone.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub user_id: SubjectId,
    pub role: Role,
}
