//! Process-wide JSON logging for the campus API.
//!
//! One JSON object per line on stdout, filtered by `RUST_LOG` (default `info`).
//! What the service emits:
//!
//! - `info`: bind address, shutdown, bootstrap admin seeding, and each
//!   successful login with `user_id` and `role`.
//! - `warn`: missing bootstrap admin, and the opt-in insecure dev signing key.
//! - `debug`: why a request was turned away. That covers the token error
//!   kind behind a 401 (malformed, wrong algorithm, bad signature, expired),
//!   the role behind a 403, and unreadable login bodies. Clients only ever see
//!   the generic answer, so this is the place to look.
//! - `error`: internal failures behind a 500.
//!
//! Passwords, digests, signing keys and raw tokens are never logged.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Initialize JSON tracing for the process, filtered by `RUST_LOG`.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .with_current_span(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn repeated_init_is_harmless() {
        super::init();
        super::init();
    }
}
