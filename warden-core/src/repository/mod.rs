//! Persistence seam for user records.
//!
//! The service layer only ever talks to [`UserRepository`]; the Postgres
//! implementation backs production and the in-memory one backs tests and
//! local development.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AuthError;
use crate::user::{NewUser, Role, User};

mod memory;
mod postgres;

pub use memory::InMemoryUserRepository;
pub use postgres::PostgresUserRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user row. Fails with [`AuthError::EmailTaken`] when the
    /// email is already registered; no partial row is left behind.
    async fn insert(&self, new_user: NewUser) -> Result<User, AuthError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, AuthError>;

    /// Overwrite the stored refresh-token hash, invalidating whatever
    /// refresh token was outstanding before.
    async fn set_refresh_token_hash(&self, user_id: Uuid, hash: &str) -> Result<(), AuthError>;

    /// Clear the stored refresh-token hash. A no-op for unknown users or
    /// users without an active session.
    async fn clear_refresh_token_hash(&self, user_id: Uuid) -> Result<(), AuthError>;

    /// Resolve just the role of a user, if the user exists.
    async fn role_of(&self, user_id: Uuid) -> Result<Option<Role>, AuthError>;

    async fn list_all(&self) -> Result<Vec<User>, AuthError>;
}
