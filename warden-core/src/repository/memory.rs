use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AuthError;
use crate::repository::UserRepository;
use crate::user::{NewUser, Role, User};

/// Hash-map-backed store with the same semantics as the Postgres
/// implementation, including the unique-email conflict. Used by the test
/// suites and handy for local development without a database.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Administrative role change. Role mutation is deliberately outside
    /// the `UserRepository` seam: no auth operation may alter roles.
    pub async fn set_role(&self, user_id: Uuid, role: Role) {
        if let Some(user) = self.users.write().await.get_mut(&user_id) {
            user.role = role;
            user.updated_at = Utc::now();
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, new_user: NewUser) -> Result<User, AuthError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == new_user.email) {
            return Err(AuthError::EmailTaken);
        }

        let now = Utc::now();
        let user = User {
            id: new_user.id,
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            refresh_token_hash: None,
            role: new_user.role,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, AuthError> {
        let users = self.users.read().await;
        Ok(users.get(&user_id).cloned())
    }

    async fn set_refresh_token_hash(&self, user_id: Uuid, hash: &str) -> Result<(), AuthError> {
        if let Some(user) = self.users.write().await.get_mut(&user_id) {
            user.refresh_token_hash = Some(hash.to_string());
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn clear_refresh_token_hash(&self, user_id: Uuid) -> Result<(), AuthError> {
        if let Some(user) = self.users.write().await.get_mut(&user_id)
            && user.refresh_token_hash.is_some()
        {
            user.refresh_token_hash = None;
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn role_of(&self, user_id: Uuid) -> Result<Option<Role>, AuthError> {
        let users = self.users.read().await;
        Ok(users.get(&user_id).map(|u| u.role))
    }

    async fn list_all(&self) -> Result<Vec<User>, AuthError> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by_key(|u| u.created_at);
        Ok(all)
    }
}
