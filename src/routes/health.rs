use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::Utc;
use serde_json::json;

use super::AppState;

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let timestamp = Utc::now().to_rfc3339();
    match state.ledger.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "online", "db": "connected", "timestamp": timestamp })),
        ),
        Err(err) => {
            tracing::error!("Health check failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "online", "db": "disconnected", "timestamp": timestamp })),
            )
        }
    }
}

async fn banner() -> &'static str {
    "Village ledger API is running"
}

pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/api/health", get(health_check))
        .with_state(state)
}
