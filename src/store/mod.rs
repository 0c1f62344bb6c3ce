//! User store collaborator.
//!
//! The authentication core does not own the user table; it reads principals
//! and writes one timestamp. [`UserStore`] is the seam: Postgres in
//! production, the in-memory store in tests and lightweight embeddings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::AuthError;
use crate::models::Principal;

pub mod memory;
pub mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a principal by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<Principal>, AuthError>;

    /// Look up a principal matching either the username or the email.
    /// Used by registration flows to reject duplicates before insert.
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<Principal>, AuthError>;

    /// Record a successful login.
    async fn update_last_login(
        &self,
        username: &str,
        at: DateTime<Utc>,
    ) -> Result<(), AuthError>;
}
