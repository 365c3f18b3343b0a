use axum::{Extension, Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use warden_core::user::{Role, User};

use crate::auth::middleware::CurrentUser;
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// Public projection of a user row. Hashes never leave the server.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<UserResponse>>> {
    // The directory answers None on denial; only the boundary turns that
    // into a status code.
    let users = state
        .directory
        .list_all_users(user.id)
        .await?
        .ok_or_else(|| AppError::forbidden("Admin access required"))?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
