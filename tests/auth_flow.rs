//! Integration tests for the login and refresh flows.
//!
//! Everything runs against the in-memory user store with bcrypt at minimum
//! cost; token verification goes through the real `TokenService` so the
//! claims that come back are the claims that went over the wire.

use authcore::config::AuthConfig;
use authcore::errors::AuthError;
use authcore::flow::AuthService;
use authcore::models::{Credential, Principal, Role};
use authcore::password::PasswordHasher;
use authcore::store::{MemoryUserStore, UserStore};
use authcore::token::TokenService;

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

const PASSWORD: &str = "Str0ng!Pw";

fn test_config() -> AuthConfig {
    AuthConfig {
        secret_key: "integration-test-signing-secret".into(),
        algorithm: "HS256".into(),
        access_token_expire_minutes: 30,
        refresh_token_expire_minutes: 60,
        bcrypt_cost: 4,
    }
}

fn seed_user(store: &MemoryUserStore, hasher: &PasswordHasher, username: &str, role: Role) {
    store.insert(Principal {
        id: Uuid::new_v4(),
        username: username.into(),
        email: format!("{username}@example.com"),
        hash_password: hasher.hash(PASSWORD).unwrap(),
        role,
        disabled: false,
        last_login: None,
        created_at: Utc::now(),
    });
}

fn service_with(config: &AuthConfig) -> (AuthService<MemoryUserStore>, MemoryUserStore) {
    let store = MemoryUserStore::new();
    let hasher = PasswordHasher::from_config(config);
    seed_user(&store, &hasher, "alice", Role::User);
    let tokens = TokenService::new(config).unwrap();
    (AuthService::new(store.clone(), tokens, hasher), store)
}

fn credential(username: &str, password: &str) -> Credential {
    Credential {
        username: username.into(),
        password: password.into(),
    }
}

// ── Login ────────────────────────────────────────────────────

#[tokio::test]
async fn login_returns_a_bearer_pair_for_the_subject() {
    let config = test_config();
    let (service, _store) = service_with(&config);

    let pair = service.login(&credential("alice", PASSWORD)).await.unwrap();
    assert_eq!(pair.token_type, "Bearer");

    let tokens = TokenService::new(&config).unwrap();
    let access = tokens.verify_token(&pair.access_token).unwrap();
    let refresh = tokens.verify_token(&pair.refresh_token).unwrap();
    assert_eq!(access.get("sub"), Some(&Value::from("alice")));
    assert_eq!(refresh.get("sub"), Some(&Value::from("alice")));
}

#[tokio::test]
async fn login_updates_the_last_login_timestamp() {
    let config = test_config();
    let (service, store) = service_with(&config);

    let before = store.find_by_username("alice").await.unwrap().unwrap();
    assert!(before.last_login.is_none());

    service.login(&credential("alice", PASSWORD)).await.unwrap();

    let after = store.find_by_username("alice").await.unwrap().unwrap();
    assert!(after.last_login.is_some());
}

#[tokio::test]
async fn refresh_token_outlives_the_access_token() {
    let config = test_config();
    let (service, _store) = service_with(&config);

    let pair = service.login(&credential("alice", PASSWORD)).await.unwrap();
    let tokens = TokenService::new(&config).unwrap();
    let access_exp = tokens.verify_token(&pair.access_token).unwrap()["exp"]
        .as_i64()
        .unwrap();
    let refresh_exp = tokens.verify_token(&pair.refresh_token).unwrap()["exp"]
        .as_i64()
        .unwrap();
    // 30 vs 60 minute TTLs, ±1s truncation tolerance.
    assert!((refresh_exp - access_exp - 30 * 60).abs() <= 1);
}

#[tokio::test]
async fn wrong_password_and_unknown_username_are_indistinguishable() {
    let config = test_config();
    let (service, _store) = service_with(&config);

    let wrong_password = service
        .login(&credential("alice", "Wr0ng!Pw"))
        .await
        .unwrap_err();
    let unknown_user = service
        .login(&credential("mallory", PASSWORD))
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, AuthError::AuthenticationFailed));
    assert!(matches!(unknown_user, AuthError::AuthenticationFailed));
    // Identical outward message: no username enumeration.
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
}

#[tokio::test]
async fn failed_login_does_not_touch_last_login() {
    let config = test_config();
    let (service, store) = service_with(&config);

    let _ = service.login(&credential("alice", "Wr0ng!Pw")).await;

    let user = store.find_by_username("alice").await.unwrap().unwrap();
    assert!(user.last_login.is_none());
}

// ── Refresh ──────────────────────────────────────────────────

#[tokio::test]
async fn refresh_reissues_a_pair_carrying_the_old_claims() {
    let config = test_config();
    let (service, _store) = service_with(&config);
    let tokens = TokenService::new(&config).unwrap();

    let mut claims = authcore::token::Claims::new();
    claims.insert("sub".to_string(), Value::from("alice"));
    claims.insert("scope".to_string(), Value::from("todos:write"));
    let refresh_token = tokens.issue_refresh_token(&claims).unwrap();

    let pair = service.refresh(&refresh_token).unwrap();

    let access = tokens.verify_token(&pair.access_token).unwrap();
    assert_eq!(access.get("sub"), Some(&Value::from("alice")));
    assert_eq!(access.get("scope"), Some(&Value::from("todos:write")));
    assert_eq!(pair.token_type, "Bearer");
}

#[tokio::test]
async fn refresh_computes_a_fresh_expiry_not_the_stale_one() {
    let config = test_config();
    let (service, _store) = service_with(&config);
    let tokens = TokenService::new(&config).unwrap();

    let mut claims = authcore::token::Claims::new();
    claims.insert("sub".to_string(), Value::from("alice"));
    let refresh_token = tokens.issue_refresh_token(&claims).unwrap();
    let old_exp = tokens.verify_token(&refresh_token).unwrap()["exp"]
        .as_i64()
        .unwrap();

    let pair = service.refresh(&refresh_token).unwrap();
    let new_access_exp = tokens.verify_token(&pair.access_token).unwrap()["exp"]
        .as_i64()
        .unwrap();

    // The access token gets now + 30min, not the refresh token's now + 60min.
    let expected = Utc::now().timestamp() + 30 * 60;
    assert!((new_access_exp - expected).abs() <= 1);
    assert!(new_access_exp < old_exp);
}

#[tokio::test]
async fn expired_refresh_token_fails_authentication() {
    let config = test_config();
    let (service, _store) = service_with(&config);

    let mut expired_cfg = test_config();
    expired_cfg.refresh_token_expire_minutes = -5;
    let expired_tokens = TokenService::new(&expired_cfg).unwrap();

    let mut claims = authcore::token::Claims::new();
    claims.insert("sub".to_string(), Value::from("alice"));
    let dead_token = expired_tokens.issue_refresh_token(&claims).unwrap();

    assert!(matches!(
        service.refresh(&dead_token),
        Err(AuthError::AuthenticationFailed)
    ));
}

#[tokio::test]
async fn garbage_refresh_token_fails_authentication() {
    let config = test_config();
    let (service, _store) = service_with(&config);

    assert!(matches!(
        service.refresh("not-a-jwt"),
        Err(AuthError::AuthenticationFailed)
    ));
}

#[tokio::test]
async fn refresh_token_signed_elsewhere_fails_authentication() {
    let config = test_config();
    let (service, _store) = service_with(&config);

    let mut foreign_cfg = test_config();
    foreign_cfg.secret_key = "someone-elses-secret".into();
    let foreign = TokenService::new(&foreign_cfg).unwrap();

    let mut claims = authcore::token::Claims::new();
    claims.insert("sub".to_string(), Value::from("alice"));
    let forged = foreign.issue_refresh_token(&claims).unwrap();

    assert!(matches!(
        service.refresh(&forged),
        Err(AuthError::AuthenticationFailed)
    ));
}
