//! User listing endpoint (admin only).

pub mod handlers;
