//! HTTP boundary for the warden authentication service.
//!
//! Exposed as a library so integration tests can build the router against
//! an in-memory user store; `main.rs` wires the same router to Postgres.

pub mod auth;
pub mod infra;
pub mod routes;
pub mod users;
