//! Process configuration read from environment variables.

use std::net::SocketAddr;
use std::str::FromStr;

use chrono::Duration;
use thiserror::Error;

use campus_auth::{DEFAULT_TOKEN_TTL_HOURS, HashParams};

const DEV_JWT_SECRET: &str = "dev-secret";
const INSECURE_DEV_SECRET_FLAG: &str = "ALLOW_INSECURE_DEV_SECRET";
/// Upper bound on `TOKEN_TTL_HOURS`: one (leap) year.
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 366;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ADMIN_USERNAME: &str = "admin";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET is not set (set ALLOW_INSECURE_DEV_SECRET=1 to use a dev key)")]
    MissingSecret,

    #[error("JWT_SECRET is set but empty")]
    EmptySecret,

    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Account seeded into the user directory at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

impl core::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct ApiConfig {
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub token_ttl: Duration,
    pub bootstrap_admin: Option<BootstrapAdmin>,
    pub hash_params: HashParams,
}

impl core::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("jwt_secret", &"<redacted>")
            .field("bind_addr", &self.bind_addr)
            .field("token_ttl", &self.token_ttl)
            .field("bootstrap_admin", &self.bootstrap_admin)
            .field("hash_params", &self.hash_params)
            .finish()
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (env, test maps).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if secret.is_empty() => return Err(ConfigError::EmptySecret),
            Some(secret) => secret,
            None if insecure_dev_secret_allowed(&lookup) => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                DEV_JWT_SECRET.to_string()
            }
            None => return Err(ConfigError::MissingSecret),
        };

        let bind_addr = parse_or(&lookup, "BIND_ADDR", || {
            SocketAddr::from_str(DEFAULT_BIND_ADDR).map_err(|e| e.to_string())
        })?;

        let ttl_hours: i64 = parse_or(&lookup, "TOKEN_TTL_HOURS", || Ok(DEFAULT_TOKEN_TTL_HOURS))?;
        let token_ttl = token_ttl(ttl_hours)?;

        let bootstrap_admin = lookup("BOOTSTRAP_ADMIN_PASSWORD")
            .filter(|p| !p.is_empty())
            .map(|password| BootstrapAdmin {
                username: lookup("BOOTSTRAP_ADMIN_USERNAME")
                    .filter(|u| !u.is_empty())
                    .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string()),
                password,
            });

        let defaults = HashParams::default();
        let hash_params = HashParams {
            memory_kib: parse_or(&lookup, "ARGON2_MEMORY_KIB", || Ok(defaults.memory_kib))?,
            iterations: parse_or(&lookup, "ARGON2_ITERATIONS", || Ok(defaults.iterations))?,
            parallelism: parse_or(&lookup, "ARGON2_PARALLELISM", || Ok(defaults.parallelism))?,
        };

        Ok(Self {
            jwt_secret,
            bind_addr,
            token_ttl,
            bootstrap_admin,
            hash_params,
        })
    }
}

fn insecure_dev_secret_allowed<F>(lookup: &F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(INSECURE_DEV_SECRET_FLAG)
        .is_some_and(|v| matches!(v.trim(), "1" | "true" | "yes"))
}

fn token_ttl(hours: i64) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        key: "TOKEN_TTL_HOURS",
        value: hours.to_string(),
        reason: reason.to_string(),
    };

    if hours <= 0 {
        return Err(invalid("must be positive"));
    }
    if hours > MAX_TOKEN_TTL_HOURS {
        return Err(invalid("must not exceed one year"));
    }
    Duration::try_hours(hours).ok_or_else(|| invalid("out of range"))
}

fn parse_or<F, T, D>(lookup: &F, key: &'static str, default: D) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: core::fmt::Display,
    D: FnOnce() -> Result<T, String>,
{
    match lookup(key) {
        Some(value) => value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
        None => default().map_err(|reason| ConfigError::Invalid {
            key,
            value: String::new(),
            reason,
        }),
    }
}
