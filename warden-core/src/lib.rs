//! # warden-core
//!
//! Credential authentication and role authorization for the warden
//! backend. The crate owns the token lifecycle protocol — issuance,
//! single-use refresh rotation, invalidation — and the role gate built on
//! top of it, behind three collaborator seams:
//!
//! - [`crypto::AuthCrypto`]: Argon2id hashing for passwords and refresh
//!   tokens (only a hash of the refresh token is ever persisted).
//! - [`token::TokenSigner`]: HS256 access/refresh pairs with independent
//!   secrets and expirations.
//! - [`repository::UserRepository`]: the user store, with Postgres and
//!   in-memory implementations.
//!
//! [`service::AuthService`] orchestrates register/login/logout/refresh;
//! [`authz::UserDirectory`] performs the admin-gated user listing.

pub mod authz;
pub mod crypto;
pub mod error;
pub mod repository;
pub mod service;
pub mod token;
pub mod user;

pub use authz::{RoleGate, UserDirectory};
pub use crypto::AuthCrypto;
pub use error::AuthError;
pub use repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository};
pub use service::AuthService;
pub use token::TokenSigner;
pub use user::{Claims, NewUser, Role, TokenPair, User};
