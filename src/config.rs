use serde::Deserialize;

/// Process-wide authentication settings.
///
/// Loaded once at startup and treated as immutable afterwards. Services take
/// a reference at construction time rather than reading the environment
/// themselves, so tests and embedders can inject their own values.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Symmetric signing secret shared by all token operations.
    pub secret_key: String,
    /// JWS algorithm name. Only HMAC variants are accepted (`HS256`,
    /// `HS384`, `HS512`).
    pub algorithm: String,
    /// Access token lifetime in minutes.
    pub access_token_expire_minutes: i64,
    /// Refresh token lifetime in minutes.
    pub refresh_token_expire_minutes: i64,
    /// bcrypt work factor for new password hashes.
    pub bcrypt_cost: u32,
}

const PLACEHOLDER_SECRET: &str = "CHANGE_ME_SIGNING_SECRET";

pub fn load() -> anyhow::Result<AuthConfig> {
    dotenvy::dotenv().ok();

    let secret_key = std::env::var("SECRET_KEY").unwrap_or_else(|_| PLACEHOLDER_SECRET.into());

    if secret_key == PLACEHOLDER_SECRET {
        let env_mode = std::env::var("AUTH_ENV")
            .or_else(|_| std::env::var("RUST_ENV"))
            .unwrap_or_default();
        if env_mode == "production" {
            anyhow::bail!(
                "SECRET_KEY is still the insecure placeholder. \
                 Set a proper random secret before running in production."
            );
        }
        eprintln!("⚠️  SECRET_KEY is not set — using insecure placeholder. Set a random secret for production.");
    }

    Ok(AuthConfig {
        secret_key,
        algorithm: std::env::var("ALGORITHM").unwrap_or_else(|_| "HS256".into()),
        access_token_expire_minutes: std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30),
        refresh_token_expire_minutes: std::env::var("REFRESH_TOKEN_EXPIRE_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60),
        bcrypt_cost: std::env::var("BCRYPT_COST")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(bcrypt::DEFAULT_COST),
    })
}
