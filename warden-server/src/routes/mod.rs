use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    auth,
    infra::app_state::AppState,
    users,
};

/// Build the full application router.
pub fn create_router(state: AppState) -> Router {
    // Routes gated on a valid access token
    let protected = Router::new()
        .route("/auth/logout", post(auth::handlers::logout))
        .route("/user", get(users::handlers::list_users))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_access_token,
        ));

    // The refresh route validates against the refresh secret instead
    let refresh = Router::new()
        .route("/auth/refresh", post(auth::handlers::refresh))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_refresh_token,
        ));

    Router::new()
        // Public authentication endpoints
        .route("/auth/register", post(auth::handlers::register))
        .route("/auth/login", post(auth::handlers::login))
        .merge(protected)
        .merge(refresh)
        .layer(cors_layer(&state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
