//! Request-scoped authorization.
//!
//! The gate turns a bearer token into a [`Principal`] and answers role
//! questions about it. Every token failure (expired, forged, malformed,
//! subject deleted, subject disabled) surfaces as the single
//! [`AuthError::Unauthenticated`]; the precise cause goes to logs only.

use crate::errors::AuthError;
use crate::models::{Principal, Role};
use crate::store::UserStore;
use crate::token::TokenService;

pub struct AuthGate<S> {
    store: S,
    tokens: TokenService,
}

impl<S: UserStore> AuthGate<S> {
    pub fn new(store: S, tokens: TokenService) -> Self {
        AuthGate { store, tokens }
    }

    /// Resolve the caller's identity from a presented token.
    ///
    /// A valid signature is not enough: the subject must still exist in the
    /// user store and must not be disabled. A deleted user holding a
    /// still-valid token is rejected here.
    pub async fn resolve_principal(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.tokens.verify_token(token).map_err(|e| {
            tracing::debug!("principal resolution rejected: {}", e);
            AuthError::Unauthenticated
        })?;

        let subject = claims
            .get("sub")
            .and_then(|v| v.as_str())
            .ok_or(AuthError::Unauthenticated)?;

        let principal = self
            .store
            .find_by_username(subject)
            .await?
            .ok_or_else(|| {
                tracing::debug!(username = %subject, "valid token for unknown principal");
                AuthError::Unauthenticated
            })?;

        if principal.disabled {
            tracing::warn!(username = %principal.username, "disabled principal presented a valid token");
            return Err(AuthError::Unauthenticated);
        }

        Ok(principal)
    }
}

/// Pass the principal through iff it holds the required role.
pub fn require_role(principal: &Principal, role: Role) -> Result<&Principal, AuthError> {
    if principal.role == role {
        Ok(principal)
    } else {
        tracing::warn!(
            username = %principal.username,
            held = %principal.role,
            required = %role,
            "role check failed"
        );
        Err(AuthError::Forbidden)
    }
}

/// Gate for admin-only operations, e.g. deleting another user's account.
pub fn require_admin(principal: &Principal) -> Result<&Principal, AuthError> {
    require_role(principal, Role::Admin)
}

/// Extract the token from an `Authorization` header value.
///
/// The scheme comparison is case-insensitive per RFC 7235. Anything other
/// than a non-empty `Bearer` credential is rejected.
pub fn bearer_token(header_value: &str) -> Result<&str, AuthError> {
    match header_value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => {
            let token = token.trim();
            if token.is_empty() {
                Err(AuthError::Unauthenticated)
            } else {
                Ok(token)
            }
        }
        _ => Err(AuthError::Unauthenticated),
    }
}
