//! Auth service wiring: token authority, credential verifier, user directory.

use std::sync::Arc;

use thiserror::Error;

use campus_auth::{CredentialError, CredentialVerifier, Role, SubjectId, TokenAuthority, TokenError};

use crate::config::{ApiConfig, BootstrapAdmin};
use crate::directory::{DirectoryError, InMemoryUserDirectory, UserDirectory, UserRecord};

const BOOTSTRAP_ADMIN_ID: SubjectId = SubjectId::new(1);

/// Failures that must abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("token authority: {0}")]
    Token(#[from] TokenError),

    #[error("credential verifier: {0}")]
    Credential(#[from] CredentialError),

    #[error("user directory: {0}")]
    Directory(#[from] DirectoryError),
}

pub struct AuthServices {
    pub tokens: Arc<TokenAuthority>,
    pub credentials: Arc<CredentialVerifier>,
    pub users: Arc<dyn UserDirectory>,
    /// Digest checked when the username is unknown, so both failure paths
    /// cost one hash verification.
    pub decoy_digest: String,
}

impl AuthServices {
    pub fn new(
        tokens: TokenAuthority,
        credentials: CredentialVerifier,
        users: Arc<dyn UserDirectory>,
    ) -> Result<Self, StartupError> {
        let decoy_digest = credentials.hash("decoy-password-never-matches")?;
        Ok(Self {
            tokens: Arc::new(tokens),
            credentials: Arc::new(credentials),
            users,
            decoy_digest,
        })
    }
}

/// Build the services described by `config`, backed by an in-memory directory.
pub fn build_services(config: &ApiConfig) -> Result<AuthServices, StartupError> {
    let tokens = TokenAuthority::new(config.jwt_secret.as_bytes())?.with_ttl(config.token_ttl)?;
    let credentials = CredentialVerifier::new(config.hash_params)?;

    let directory = InMemoryUserDirectory::new();
    if let Some(admin) = &config.bootstrap_admin {
        seed_admin(&directory, &credentials, admin)?;
    } else {
        tracing::warn!("BOOTSTRAP_ADMIN_PASSWORD not set; user directory starts empty");
    }

    AuthServices::new(tokens, credentials, Arc::new(directory))
}

fn seed_admin(
    directory: &InMemoryUserDirectory,
    credentials: &CredentialVerifier,
    admin: &BootstrapAdmin,
) -> Result<(), StartupError> {
    let password_digest = credentials.hash(&admin.password)?;
    directory.insert(UserRecord {
        id: BOOTSTRAP_ADMIN_ID,
        username: admin.username.clone(),
        password_digest,
        role: Role::Admin,
        name: "System Administrator".to_string(),
        email: "admin@university.edu".to_string(),
        phone: String::new(),
    })?;

    tracing::info!(username = %admin.username, "seeded bootstrap admin account");
    Ok(())
}
