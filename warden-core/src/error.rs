//! Error types for the authentication core.

use thiserror::Error;

use crate::crypto::AuthCryptoError;

/// Failures surfaced by the auth and authorization components.
///
/// Login and refresh deliberately collapse every credential failure into
/// [`AuthError::AccessDenied`]: a wrong password, an unknown email, a
/// missing session, and a mismatched refresh token are indistinguishable to
/// the caller, so responses never leak whether an account exists.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Registration hit the store's unique-email constraint.
    #[error("email already registered")]
    EmailTaken,

    /// Credentials or refresh session could not be verified.
    #[error("access denied")]
    AccessDenied,

    /// Token signing or decoding failed.
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Password or refresh-token hashing failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] AuthCryptoError),

    /// A collaborator (usually the store) failed; propagated unchanged.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return AuthError::EmailTaken;
        }
        AuthError::Internal(err.into())
    }
}
