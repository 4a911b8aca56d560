//! In-memory implementation of [`UserRepository`].

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, User, UserId};

/// Map-backed user store keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().await;
        let Some(slot) = users.get_mut(&user.id) else {
            return Err(UserPersistenceError::missing(user.id.to_string()));
        };
        *slot = user.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| &user.email == email).cloned())
    }

    async fn list_candidates(&self) -> Result<Vec<User>, UserPersistenceError> {
        let users = self.users.read().await;
        let mut candidates: Vec<User> = users
            .values()
            .filter(|user| user.is_candidate())
            .cloned()
            .collect();
        candidates.sort_by_key(|user| user.created_at);
        Ok(candidates)
    }
}
