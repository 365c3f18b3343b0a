use anyhow::{Context, bail};
use std::env;

/// Server configuration loaded via environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Server settings
    pub server_host: String,
    pub server_port: u16,

    // Database settings
    pub database_url: String,

    // Authentication secrets: independent signing keys for the two token
    // kinds plus the Argon2 pepper. Names follow the original deployment.
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub password_pepper: String,

    // CORS settings
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: parse_port(
                &env::var("SERVER_PORT").unwrap_or_else(|_| "3000".to_string()),
            )?,

            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,

            access_token_secret: env::var("AT_SECRET").context("AT_SECRET must be set")?,
            refresh_token_secret: env::var("RT_SECRET").context("RT_SECRET must be set")?,
            password_pepper: env::var("AUTH_PASSWORD_PEPPER")
                .context("AUTH_PASSWORD_PEPPER must be set")?,

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
        };

        // A shared secret would let a leaked refresh key mint access tokens.
        if config.access_token_secret == config.refresh_token_secret {
            bail!("AT_SECRET and RT_SECRET must be distinct");
        }

        Ok(config)
    }
}

/// A typo'd port should stop startup, not silently bind the default.
fn parse_port(raw: &str) -> anyhow::Result<u16> {
    raw.parse()
        .with_context(|| format!("SERVER_PORT is not a valid port: {raw:?}"))
}
