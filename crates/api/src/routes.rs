use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// Creates all API routes with state
pub fn create_api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/debug", get(handlers::get_debug_snapshot))
        .route("/reload_conf", post(handlers::reload_conf))
        .with_state(state)
}
