//! Credential verifier: salted, adaptive password hashing (Argon2id).

use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};
use password_hash::{PasswordHash, SaltString};
use thiserror::Error;

const SALT_LEN: usize = 16;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("invalid hashing parameters: {0}")]
    InvalidParams(String),

    #[error("salt generation failed: {0}")]
    Salt(String),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Argon2 cost parameters.
///
/// These only affect newly created digests; every digest records the
/// parameters it was made with, so older digests keep verifying.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HashParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Clone)]
pub struct CredentialVerifier {
    argon2: Argon2<'static>,
}

impl CredentialVerifier {
    pub fn new(params: HashParams) -> Result<Self, CredentialError> {
        let params = Params::new(params.memory_kib, params.iterations, params.parallelism, None)
            .map_err(|e| CredentialError::InvalidParams(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Produce a PHC-format digest of `secret` with a fresh random salt.
    pub fn hash(&self, secret: &str) -> Result<String, CredentialError> {
        let mut salt_bytes = [0u8; SALT_LEN];
        getrandom::getrandom(&mut salt_bytes).map_err(|e| CredentialError::Salt(e.to_string()))?;
        let salt =
            SaltString::encode_b64(&salt_bytes).map_err(|e| CredentialError::Salt(e.to_string()))?;

        let digest = self
            .argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hash(e.to_string()))?;
        Ok(digest.to_string())
    }

    /// Check `secret` against a stored digest.
    ///
    /// The digest's own algorithm and parameters are used and the final
    /// comparison is constant-time. A digest that does not parse is reported
    /// as a plain mismatch.
    pub fn verify(&self, secret: &str, digest: &str) -> bool {
        match PasswordHash::new(digest) {
            Ok(parsed) => self
                .argon2
                .verify_password(secret.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

impl Default for CredentialVerifier {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl core::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CredentialVerifier")
            .field("algorithm", &Algorithm::Argon2id)
            .field("params", self.argon2.params())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier() -> CredentialVerifier {
        CredentialVerifier::new(HashParams {
            memory_kib: 256,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn hash_then_verify_matches() {
        let v = verifier();
        let digest = v.hash("correct horse battery staple").unwrap();

        assert!(digest.starts_with("$argon2id$"));
        assert!(v.verify("correct horse battery staple", &digest));
    }

    #[test]
    fn different_secret_does_not_match() {
        let v = verifier();
        let digest = v.hash("correct").unwrap();

        assert!(!v.verify("wrong", &digest));
        assert!(!v.verify("", &digest));
        assert!(!v.verify("Correct", &digest));
    }

    #[test]
    fn hashing_is_salted() {
        let v = verifier();
        let a = v.hash("same").unwrap();
        let b = v.hash("same").unwrap();

        assert_ne!(a, b);
        assert!(v.verify("same", &a));
        assert!(v.verify("same", &b));
    }

    #[test]
    fn malformed_digest_is_a_mismatch() {
        let v = verifier();
        for digest in ["", "plaintext", "$argon2id$", "$2a$10$abcdefghijklmnopqrstuv"] {
            assert!(!v.verify("anything", digest), "{digest:?}");
        }
    }

    #[test]
    fn digests_survive_parameter_changes() {
        let digest = verifier().hash("s3cret").unwrap();
        let heavier = CredentialVerifier::new(HashParams {
            memory_kib: 512,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();

        assert!(heavier.verify("s3cret", &digest));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let err = CredentialVerifier::new(HashParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        })
        .unwrap_err();
        assert!(matches!(err, CredentialError::InvalidParams(_)));
    }
}
