//! Session token authority: mints and verifies HS256-signed identity claims.
//!
//! The authority owns the only copy of the signing key. It performs no IO and
//! holds no mutable state, so one instance is shared (behind an `Arc`) by every
//! in-flight request.

use std::collections::HashSet;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::{ISSUER, IdentityClaim, TokenError, validate_claims};
use crate::{Role, SubjectId};

/// Lifetime of a freshly issued token unless overridden with [`TokenAuthority::with_ttl`].
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Verification seam used by the HTTP layer.
///
/// The clock is passed in so callers (and tests) control what "now" means.
pub trait TokenVerifier: Send + Sync {
    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityClaim, TokenError>;
}

#[derive(Clone)]
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenAuthority {
    /// Build an authority around a symmetric signing key.
    ///
    /// An empty key is rejected; callers treat that as a startup failure.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, TokenError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(TokenError::EmptySigningKey);
        }

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        // Time checks happen in `validate_claims` against an explicit clock.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
        })
    }

    /// Override the token lifetime. A zero or negative lifetime is refused.
    pub fn with_ttl(mut self, ttl: Duration) -> Result<Self, TokenError> {
        if ttl <= Duration::zero() {
            return Err(TokenError::InvalidTtl);
        }
        self.ttl = ttl;
        Ok(self)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, subject_id: SubjectId, role: Role) -> Result<String, TokenError> {
        self.issue_at(subject_id, role, Utc::now())
    }

    /// Mint a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        subject_id: SubjectId,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        // NumericDate has whole-second resolution.
        let issued_at = now.trunc_subsecs(0);
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Signing("expiry out of range".to_string()))?;
        let claims = IdentityClaim {
            subject_id,
            role,
            issued_at,
            expires_at,
            issuer: ISSUER.to_string(),
        };

        jsonwebtoken::encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<IdentityClaim, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Decode and verify `token`, judging expiry against `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityClaim, TokenError> {
        let data = jsonwebtoken::decode::<IdentityClaim>(token, &self.decoding, &self.validation)
            .map_err(classify_decode_error)?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

impl TokenVerifier for TokenAuthority {
    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityClaim, TokenError> {
        TokenAuthority::verify_at(self, token, now)
    }
}

impl core::fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("algorithm", &SIGNING_ALGORITHM)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

fn classify_decode_error(err: JwtError) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidAlgorithm | ErrorKind::MissingAlgorithm => {
            TokenError::UnexpectedSigningMethod
        }
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}
