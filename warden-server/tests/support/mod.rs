use std::sync::Arc;

use argon2::ParamsBuilder;
use axum_test::TestServer;
use serde_json::{Value, json};

use warden_core::{
    AuthCrypto, AuthService, InMemoryUserRepository, TokenSigner, UserDirectory,
};
use warden_server::{
    infra::{app_state::AppState, config::Config},
    routes,
};

pub const ACCESS_SECRET: &str = "at-secret-for-tests";
pub const REFRESH_SECRET: &str = "rt-secret-for-tests";

pub struct TestApp {
    pub server: TestServer,
    pub repo: Arc<InMemoryUserRepository>,
}

/// Build the real router over an in-memory store, with cheap Argon2
/// parameters so the suite does not spend its time hashing.
pub fn build_test_app() -> TestApp {
    let config = Arc::new(Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        database_url: "postgres://unused".to_string(),
        access_token_secret: ACCESS_SECRET.to_string(),
        refresh_token_secret: REFRESH_SECRET.to_string(),
        password_pepper: "test-pepper".to_string(),
        cors_allowed_origins: vec!["http://localhost:3000".to_string()],
    });

    let params = ParamsBuilder::new()
        .m_cost(8)
        .t_cost(1)
        .p_cost(1)
        .output_len(32)
        .build()
        .expect("valid test params");

    let repo = Arc::new(InMemoryUserRepository::new());
    let crypto = Arc::new(
        AuthCrypto::with_params(config.password_pepper.as_bytes(), params).expect("crypto"),
    );
    let tokens = Arc::new(TokenSigner::new(
        config.access_token_secret.as_bytes(),
        config.refresh_token_secret.as_bytes(),
    ));

    let state = AppState {
        auth: Arc::new(AuthService::new(repo.clone(), crypto, tokens.clone())),
        directory: Arc::new(UserDirectory::new(repo.clone())),
        tokens,
        config,
    };

    let server = TestServer::new(routes::create_router(state)).expect("test server");
    TestApp { server, repo }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Register a user and hand back the decoded token pair body.
pub async fn register_user(server: &TestServer, name: &str, email: &str, password: &str) -> Value {
    let response = server
        .post("/auth/register")
        .json(&json!({
            "name": name,
            "email": email,
            "password": password,
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}

pub fn token_field<'a>(body: &'a Value, key: &str) -> &'a str {
    body[key]
        .as_str()
        .unwrap_or_else(|| panic!("missing token field: {key}"))
}
