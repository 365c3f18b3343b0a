use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::Deserialize;
use warden_core::TokenPair;

use super::middleware::{CurrentUser, RefreshSession};
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty");
        }
        // Shallow shape check; the store's unique index is the authority
        // on whether the address is usable.
        let (local, domain) = self.email.split_once('@').ok_or("invalid email address")?;
        if local.is_empty() || !domain.contains('.') {
            return Err("invalid email address");
        }
        if self.password.len() < MIN_PASSWORD_LENGTH {
            return Err("password must be at least 8 characters");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<TokenPair>)> {
    request
        .validate()
        .map_err(|e| AppError::bad_request(format!("Validation error: {e}")))?;

    let pair = state
        .auth
        .register(&request.name, &request.email, &request.password)
        .await?;

    Ok((StatusCode::CREATED, Json(pair)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<TokenPair>> {
    let pair = state.auth.login(&request.email, &request.password).await?;
    Ok(Json(pair))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<bool>> {
    let cleared = state.auth.logout(user.id).await?;
    Ok(Json(cleared))
}

pub async fn refresh(
    State(state): State<AppState>,
    Extension(session): Extension<RefreshSession>,
) -> AppResult<Json<TokenPair>> {
    let pair = state
        .auth
        .refresh(session.user_id, &session.refresh_token)
        .await?;
    Ok(Json(pair))
}
