//! bcrypt credential hashing and password strength rules.
//!
//! Hashing and verification are CPU-bound and intentionally slow; async
//! callers must not run them on the event loop. The login flow offloads them
//! with `tokio::task::spawn_blocking` (see `flow`).

use crate::config::AuthConfig;
use crate::errors::AuthError;

/// Symbols a password may draw its required special character from.
pub const ALLOWED_SYMBOLS: &str = "!@#$%^&*()-_=+[]{}|;:,.<>?";

const MIN_PASSWORD_LEN: usize = 6;
const MAX_PASSWORD_LEN: usize = 20;

/// One-way hashing and verification for credentials.
///
/// Holds only the configured work factor; cheap to clone into blocking
/// tasks. The cost is fixed at construction, matching the process-wide
/// immutable configuration.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        PasswordHasher { cost }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        PasswordHasher::new(config.bcrypt_cost)
    }

    /// Hash a password with a fresh random salt.
    ///
    /// Output is not reproducible byte-for-byte; use [`verify`](Self::verify)
    /// to check a candidate, never equality on re-hashed input.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        if password.is_empty() {
            return Err(AuthError::InvalidArgument(
                "password must not be empty".into(),
            ));
        }
        bcrypt::hash(password, self.cost)
            .map_err(|e| AuthError::Internal(anyhow::anyhow!("bcrypt hash failed: {e}")))
    }

    /// Verify a plaintext candidate against a stored hash.
    ///
    /// A stored hash that bcrypt cannot parse verifies as `false`: garbage
    /// in the store must fail authentication, not surface as a server error.
    pub fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, AuthError> {
        if plaintext.is_empty() {
            return Err(AuthError::InvalidArgument(
                "password must not be empty".into(),
            ));
        }
        match bcrypt::verify(plaintext, hash) {
            Ok(matches) => Ok(matches),
            Err(e) => {
                tracing::warn!("stored password hash rejected by bcrypt: {}", e);
                Ok(false)
            }
        }
    }
}

/// Password strength policy: 6–20 characters with at least one lowercase
/// letter, one uppercase letter, one digit, and one symbol from
/// [`ALLOWED_SYMBOLS`].
///
/// The 20-character ceiling excludes long passphrases; it is kept as-is to
/// stay wire-compatible with existing account validation.
pub fn validate_strength(password: &str) -> bool {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return false;
    }
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| ALLOWED_SYMBOLS.contains(c));
    has_lower && has_upper && has_digit && has_symbol
}
