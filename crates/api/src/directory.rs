//! User lookup for login.
//!
//! The SQL-backed directory lives with the persistence layer; this module
//! defines the seam and an in-memory implementation for dev/tests.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

use campus_auth::{Role, SubjectId};

/// A `users` row as seen by the login flow.
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: SubjectId,
    pub username: String,
    pub password_digest: String,
    pub role: Role,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl core::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_digest", &"<redacted>")
            .field("role", &self.role)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .finish()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("username already exists: {0}")]
    DuplicateUsername(String),

    #[error("user id already exists: {0}")]
    DuplicateId(SubjectId),

    #[error("user directory unavailable: {0}")]
    Unavailable(String),
}

/// Read-only view of stored credentials.
pub trait UserDirectory: Send + Sync {
    fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, DirectoryError>;
}

/// In-memory user directory keyed by username.
///
/// Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: UserRecord) -> Result<(), DirectoryError> {
        let mut users = self
            .users
            .write()
            .map_err(|_| DirectoryError::Unavailable("lock poisoned".to_string()))?;

        if users.contains_key(&record.username) {
            return Err(DirectoryError::DuplicateUsername(record.username));
        }
        if users.values().any(|u| u.id == record.id) {
            return Err(DirectoryError::DuplicateId(record.id));
        }

        users.insert(record.username.clone(), record);
        Ok(())
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, DirectoryError> {
        let users = self
            .users
            .read()
            .map_err(|_| DirectoryError::Unavailable("lock poisoned".to_string()))?;
        Ok(users.get(username).cloned())
    }
}
