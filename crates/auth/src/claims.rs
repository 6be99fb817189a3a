use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Role, SubjectId};

/// Issuer tag stamped into every token minted by this service.
pub const ISSUER: &str = "university-system";

/// Identity claim carried in a signed token.
///
/// Field names follow the wire format (`user_id`, `role`, `iat`, `exp`, `iss`);
/// timestamps are encoded as JWT NumericDate (whole seconds since the epoch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaim {
    /// Subject identifier.
    #[serde(rename = "user_id")]
    pub subject_id: SubjectId,

    pub role: Role,

    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,

    #[serde(rename = "iss")]
    pub issuer: String,
}

/// Reasons a token is rejected (or fails to be minted).
///
/// Callers at the HTTP boundary collapse every variant into one generic
/// "unauthorized" answer; the variant is for logs and tests only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("unexpected signing method")]
    UnexpectedSigningMethod,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("signing key must not be empty")]
    EmptySigningKey,

    #[error("token lifetime must be positive")]
    InvalidTtl,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Check the time window of already-decoded claims.
///
/// The token is expired once `now` reaches `expires_at`. A claim whose window
/// is inverted (`expires_at <= issued_at`) is treated as malformed.
pub fn validate_claims(claims: &IdentityClaim, now: DateTime<Utc>) -> Result<(), TokenError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenError::Malformed);
    }
    if now >= claims.expires_at {
        return Err(TokenError::Expired);
    }
    Ok(())
}
