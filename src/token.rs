//! Signed, expiring access and refresh tokens.
//!
//! Tokens are compact JWTs signed with a process-wide symmetric secret.
//! They are self-contained and stateless: no session record exists server
//! side, so a token is valid until its `exp` passes and cannot be revoked
//! earlier. Claims are an open map: callers put `sub` in, the service
//! injects `exp`, and everything else passes through untouched.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::Value;

use crate::config::AuthConfig;
use crate::errors::AuthError;

/// Token payload: arbitrary keys, `sub` required on issue, `exp` injected.
pub type Claims = serde_json::Map<String, Value>;

/// Issues and validates HMAC-signed tokens.
///
/// The secret, algorithm, and TTLs are captured at construction and never
/// change, so the service is freely shareable across concurrent requests.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let algorithm = match config.algorithm.as_str() {
            "HS256" => Algorithm::HS256,
            "HS384" => Algorithm::HS384,
            "HS512" => Algorithm::HS512,
            other => {
                return Err(AuthError::InvalidArgument(format!(
                    "unsupported signing algorithm: {other}"
                )))
            }
        };

        // Expiry is checked on the whole-second boundary; the default 60s
        // leeway would keep expired tokens alive.
        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;

        Ok(TokenService {
            encoding: EncodingKey::from_secret(config.secret_key.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret_key.as_bytes()),
            algorithm,
            validation,
            access_ttl: Duration::minutes(config.access_token_expire_minutes),
            refresh_ttl: Duration::minutes(config.refresh_token_expire_minutes),
        })
    }

    /// Issue a short-lived access token.
    pub fn issue_access_token(&self, claims: &Claims) -> Result<String, AuthError> {
        self.issue(claims, self.access_ttl)
    }

    /// Issue a longer-lived refresh token.
    pub fn issue_refresh_token(&self, claims: &Claims) -> Result<String, AuthError> {
        self.issue(claims, self.refresh_ttl)
    }

    fn issue(&self, claims: &Claims, ttl: Duration) -> Result<String, AuthError> {
        if !claims.get("sub").is_some_and(Value::is_string) {
            return Err(AuthError::InvalidArgument(
                "claims must carry a string `sub`".into(),
            ));
        }

        let mut to_encode = claims.clone();
        let expire = Utc::now() + ttl;
        // timestamp() truncates fractional seconds, matching verification on
        // the whole-second boundary.
        to_encode.insert("exp".to_string(), Value::from(expire.timestamp()));

        encode(&Header::new(self.algorithm), &to_encode, &self.encoding)
            .map_err(|e| AuthError::Internal(anyhow::anyhow!("token signing failed: {e}")))
    }

    /// Decode a token, checking signature, structure, algorithm, and expiry.
    ///
    /// Returns [`AuthError::ExpiredToken`] for a past `exp` and
    /// [`AuthError::InvalidToken`] for everything else; callers collapse both
    /// to a 401 and only logs keep the distinction.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                tracing::debug!("token rejected: expired");
                Err(AuthError::ExpiredToken)
            }
            Err(e) => {
                tracing::debug!("token rejected: {}", e);
                Err(AuthError::InvalidToken)
            }
        }
    }
}
