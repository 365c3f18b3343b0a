use async_trait::async_trait;
use sqlx::PgPool;
use std::fmt;
use uuid::Uuid;

use crate::error::AuthError;
use crate::repository::UserRepository;
use crate::user::{NewUser, Role, User};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, refresh_token_hash, role, created_at, updated_at";

/// sqlx-backed store. Relies on the `users` table's unique email index for
/// conflict detection and on per-row consistency for everything else; no
/// transactions or retries.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl fmt::Debug for PostgresUserRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresUserRepository").finish()
    }
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, new_user: NewUser) -> Result<User, AuthError> {
        let query = format!(
            "INSERT INTO users (id, name, email, password_hash, role) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        );

        // A duplicate email surfaces as a unique violation and maps to
        // EmailTaken in the From<sqlx::Error> conversion.
        let user = sqlx::query_as::<_, User>(&query)
            .bind(new_user.id)
            .bind(&new_user.name)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(new_user.role)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, AuthError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn set_refresh_token_hash(&self, user_id: Uuid, hash: &str) -> Result<(), AuthError> {
        sqlx::query("UPDATE users SET refresh_token_hash = $2, updated_at = now() WHERE id = $1")
            .bind(user_id)
            .bind(hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear_refresh_token_hash(&self, user_id: Uuid) -> Result<(), AuthError> {
        // Only touches rows with an active session; absent users and
        // already-cleared sessions fall through without error.
        sqlx::query(
            "UPDATE users SET refresh_token_hash = NULL, updated_at = now() \
             WHERE id = $1 AND refresh_token_hash IS NOT NULL",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn role_of(&self, user_id: Uuid) -> Result<Option<Role>, AuthError> {
        let role = sqlx::query_scalar::<_, Role>("SELECT role FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(role)
    }

    async fn list_all(&self) -> Result<Vec<User>, AuthError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at");
        let users = sqlx::query_as::<_, User>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }
}
