use std::{fmt, sync::Arc};

use warden_core::{AuthCrypto, AuthService, TokenSigner, UserDirectory, UserRepository};

use crate::infra::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub directory: Arc<UserDirectory>,
    pub tokens: Arc<TokenSigner>,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire the core services around whichever store the caller provides
    /// (Postgres in production, in-memory in tests).
    pub fn new(config: Arc<Config>, users: Arc<dyn UserRepository>) -> anyhow::Result<Self> {
        let crypto = Arc::new(AuthCrypto::new(config.password_pepper.as_bytes())?);
        let tokens = Arc::new(TokenSigner::new(
            config.access_token_secret.as_bytes(),
            config.refresh_token_secret.as_bytes(),
        ));

        Ok(Self {
            auth: Arc::new(AuthService::new(
                users.clone(),
                crypto,
                tokens.clone(),
            )),
            directory: Arc::new(UserDirectory::new(users)),
            tokens,
            config,
        })
    }
}
