//! Core user and token types shared between the service layer and the HTTP
//! boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access level attached to every user account.
///
/// Stored as the Postgres enum `user_role`. Roles are only changed by
/// administrative action; there is no self-service elevation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// A registered user account.
///
/// `password_hash` and `refresh_token_hash` are Argon2id PHC strings; the
/// raw secrets they were derived from are never persisted. At most one
/// refresh-token hash is live per user: issuing a new token pair overwrites
/// it, which invalidates whatever refresh token was outstanding before.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Display name supplied at registration
    pub name: String,
    /// Unique email address used for login
    pub email: String,
    /// Argon2id hash of the login password
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Argon2id hash of the currently valid refresh token, if any
    #[serde(skip_serializing)]
    pub refresh_token_hash: Option<String>,
    /// Access level of this account
    pub role: Role,
    /// Timestamp of account creation
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last credential update
    pub updated_at: DateTime<Utc>,
}

/// Row data for a user about to be inserted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl NewUser {
    /// Build an insertable record with a fresh v7 id and the default role.
    pub fn new(name: impl Into<String>, email: impl Into<String>, password_hash: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            email: email.into(),
            password_hash,
            role: Role::default(),
        }
    }
}

/// JWT claims carried by both tokens of a pair.
///
/// `jti` makes every issued token unique even when two are signed for the
/// same identity within the same second; without it, rotation could store
/// a hash of a byte-identical replacement and a spent refresh token would
/// still verify.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,     // User ID
    pub email: String, // Login email at issuance time
    pub iat: i64,      // Issued at
    pub exp: i64,      // Expiration time
    pub jti: String,   // Unique token id
}

/// The two signed tokens returned by register, login, and refresh.
///
/// Wire shape is exactly `{ "access_token": ..., "refresh_token": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived credential authorizing API calls
    pub access_token: String,
    /// Long-lived credential exchanged for a new pair; single-use
    pub refresh_token: String,
}
