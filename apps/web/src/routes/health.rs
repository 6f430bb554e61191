use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus reachability of the matching service.
/// Never fails itself.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let upstream = if state.matcher.is_healthy().await {
        "healthy"
    } else {
        "unreachable"
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "recruitify-web",
        "upstream": upstream
    }))
}
