//! `campus-auth` — credential verification, session tokens and role checks.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod authorize;
pub mod claims;
pub mod password;
pub mod principal;
pub mod roles;
pub mod token;

pub use authorize::{authorize, AuthzError, RoleAllowList};
pub use claims::{ISSUER, IdentityClaim, TokenError, validate_claims};
pub use password::{CredentialError, CredentialVerifier, HashParams};
pub use principal::SubjectId;
pub use roles::{Role, UnknownRole};
pub use token::{DEFAULT_TOKEN_TTL_HOURS, TokenAuthority, TokenVerifier};
