use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::errors::AuthError;
use crate::models::Principal;
use crate::store::UserStore;

/// In-memory user store keyed by username.
///
/// Backs tests and embedders that don't run Postgres. Clones share the same
/// underlying map, so a store handed to both the login flow and the
/// authorization gate observes the same users.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<DashMap<String, Principal>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, principal: Principal) {
        self.users.insert(principal.username.clone(), principal);
    }

    pub fn remove(&self, username: &str) -> Option<Principal> {
        self.users.remove(username).map(|(_, p)| p)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Principal>, AuthError> {
        Ok(self.users.get(username).map(|entry| entry.value().clone()))
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<Principal>, AuthError> {
        if let Some(principal) = self.users.get(username) {
            return Ok(Some(principal.value().clone()));
        }
        Ok(self
            .users
            .iter()
            .find(|entry| entry.value().email == email)
            .map(|entry| entry.value().clone()))
    }

    async fn update_last_login(
        &self,
        username: &str,
        at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        if let Some(mut entry) = self.users.get_mut(username) {
            entry.last_login = Some(at);
        }
        Ok(())
    }
}
