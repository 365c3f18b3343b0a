use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::infra::{app_state::AppState, errors::AppError};

/// Identity extracted from a validated access token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

/// Identity plus the raw refresh token, extracted on the refresh route.
///
/// The raw token travels with the identity because the service must
/// verify it against the stored hash; a decodable token alone does not
/// prove the session is still live.
#[derive(Debug, Clone)]
pub struct RefreshSession {
    pub user_id: Uuid,
    pub refresh_token: String,
}

pub async fn require_access_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request)?;
    let claims = state
        .tokens
        .decode_access(&token)
        .map_err(|_| AppError::unauthorized("Invalid or expired access token"))?;

    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        email: claims.email,
    });
    Ok(next.run(request).await)
}

pub async fn require_refresh_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request)?;
    let claims = state
        .tokens
        .decode_refresh(&token)
        .map_err(|_| AppError::unauthorized("Invalid or expired refresh token"))?;

    request.extensions_mut().insert(RefreshSession {
        user_id: claims.sub,
        refresh_token: token,
    });
    Ok(next.run(request).await)
}

fn extract_bearer_token(request: &Request) -> Result<String, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

    if !auth_header.starts_with("Bearer ") {
        return Err(AppError::unauthorized("Missing bearer token"));
    }

    Ok(auth_header[7..].to_string())
}
