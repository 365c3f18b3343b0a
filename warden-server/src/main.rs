//! # Warden Server
//!
//! Credential-based authentication and role-authorization backend.
//!
//! - **Registration & login**: Argon2id-hashed credentials
//! - **Token pairs**: short-lived access + long-lived refresh JWTs with
//!   independent secrets
//! - **Refresh rotation**: each refresh spends the presented token and
//!   overwrites the stored hash (one live session per user)
//! - **Role gate**: admin-only user listing
//!
//! Built on Axum with PostgreSQL for persistent storage.

use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use warden_core::{PostgresUserRepository, UserRepository};
use warden_server::{
    infra::{app_state::AppState, config::Config},
    routes,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warden_server=info,warden_core=info,tower_http=info".into()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("failed to connect to Postgres")?;

    let users: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(pool));
    let state = AppState::new(config.clone(), users)?;
    let app = routes::create_router(state);

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        return;
    }
    info!("shutdown signal received");
}
