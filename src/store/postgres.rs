use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AuthError;
use crate::models::{Principal, Role};
use crate::store::UserStore;

/// Postgres-backed user store.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool, e.g. one shared with the rest of the backend.
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run pending migrations from the migrations/ directory.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

const PRINCIPAL_COLUMNS: &str =
    "id, username, email, hash_password, role, disabled, last_login, created_at";

/// Raw row shape; `role` stays TEXT in the table and is parsed on the way
/// out so an unknown value surfaces as an error instead of a default role.
#[derive(sqlx::FromRow)]
struct PrincipalRow {
    id: Uuid,
    username: String,
    email: String,
    hash_password: String,
    role: String,
    disabled: bool,
    last_login: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl PrincipalRow {
    fn into_principal(self) -> Result<Principal, AuthError> {
        let role = Role::from_str(&self.role).map_err(|_| {
            AuthError::Internal(anyhow::anyhow!(
                "user {} carries unknown role '{}'",
                self.username,
                self.role
            ))
        })?;
        Ok(Principal {
            id: self.id,
            username: self.username,
            email: self.email,
            hash_password: self.hash_password,
            role,
            disabled: self.disabled,
            last_login: self.last_login,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Principal>, AuthError> {
        let row = sqlx::query_as::<_, PrincipalRow>(&format!(
            "SELECT {PRINCIPAL_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(PrincipalRow::into_principal).transpose()
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<Principal>, AuthError> {
        let row = sqlx::query_as::<_, PrincipalRow>(&format!(
            "SELECT {PRINCIPAL_COLUMNS} FROM users WHERE username = $1 OR email = $2"
        ))
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(PrincipalRow::into_principal).transpose()
    }

    async fn update_last_login(
        &self,
        username: &str,
        at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        sqlx::query("UPDATE users SET last_login = $2 WHERE username = $1")
            .bind(username)
            .bind(at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
