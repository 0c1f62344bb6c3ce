//! Login and token refresh.
//!
//! Both operations return a fresh access/refresh pair. Login verifies a
//! credential against the stored bcrypt hash; refresh trades a still-valid
//! refresh token for a new pair carrying the same claims.

use chrono::Utc;
use serde_json::Value;

use crate::errors::AuthError;
use crate::models::{Credential, TokenPair};
use crate::password::PasswordHasher;
use crate::store::UserStore;
use crate::token::{Claims, TokenService};

pub struct AuthService<S> {
    store: S,
    tokens: TokenService,
    hasher: PasswordHasher,
}

impl<S: UserStore> AuthService<S> {
    pub fn new(store: S, tokens: TokenService, hasher: PasswordHasher) -> Self {
        AuthService {
            store,
            tokens,
            hasher,
        }
    }

    /// Verify a credential and issue a token pair for its subject.
    ///
    /// An unknown username and a wrong password produce the same
    /// [`AuthError::AuthenticationFailed`], so responses cannot be used to
    /// enumerate accounts. On success the principal's last-login timestamp
    /// is persisted through the store.
    pub async fn login(&self, credential: &Credential) -> Result<TokenPair, AuthError> {
        let user = match self.store.find_by_username(&credential.username).await? {
            Some(user) => user,
            None => {
                tracing::warn!(username = %credential.username, "login rejected: unknown username");
                return Err(AuthError::AuthenticationFailed);
            }
        };

        // bcrypt takes tens of milliseconds; keep it off the async workers.
        let hasher = self.hasher.clone();
        let password = credential.password.clone();
        let stored_hash = user.hash_password.clone();
        let verified = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| AuthError::Internal(anyhow::anyhow!("bcrypt task failed: {e}")))??;

        if !verified {
            tracing::warn!(username = %credential.username, "login rejected: wrong password");
            return Err(AuthError::AuthenticationFailed);
        }

        self.store
            .update_last_login(&user.username, Utc::now())
            .await?;

        let mut claims = Claims::new();
        claims.insert("sub".to_string(), Value::from(user.username.as_str()));

        Ok(TokenPair::bearer(
            self.tokens.issue_access_token(&claims)?,
            self.tokens.issue_refresh_token(&claims)?,
        ))
    }

    /// Trade a refresh token for a new access/refresh pair.
    ///
    /// The new tokens carry the full claim set of the old one, minus its
    /// `exp`: re-signing the stale expiry would produce tokens that are
    /// already dead or outlive their TTL.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let mut claims = self.tokens.verify_token(refresh_token).map_err(|e| {
            tracing::debug!("refresh rejected: {}", e);
            AuthError::AuthenticationFailed
        })?;

        claims.remove("exp");

        Ok(TokenPair::bearer(
            self.tokens.issue_access_token(&claims)?,
            self.tokens.issue_refresh_token(&claims)?,
        ))
    }
}
