pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::form::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Match page
        .route("/", get(handlers::handle_index))
        .route("/match", post(handlers::handle_match))
        .route("/reset", post(handlers::handle_reset))
        // JSON
        .route("/api/v1/match", post(handlers::handle_api_match))
        .with_state(state)
}
