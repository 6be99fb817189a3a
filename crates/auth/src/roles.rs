use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role tag carried in identity claims and checked by route allow-lists.
///
/// The set is closed: tokens naming any other tag fail to decode. Roles are
/// flat, there is no hierarchy (`Admin` does not imply `Teacher`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System administrator.
    Admin,
    /// Academic affairs office staff.
    Academic,
    /// Department administrator.
    Department,
    Teacher,
    Student,
    /// Teaching supervisor.
    Supervisor,
    Finance,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Admin,
        Role::Academic,
        Role::Department,
        Role::Teacher,
        Role::Student,
        Role::Supervisor,
        Role::Finance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Academic => "academic",
            Role::Department => "department",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Supervisor => "supervisor",
            Role::Finance => "finance",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
