//! Authentication endpoints and token-extraction middleware.

pub mod handlers;
pub mod middleware;
