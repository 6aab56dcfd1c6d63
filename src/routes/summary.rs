use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use super::{utils::validate_auth_token, AppState};
use crate::error::LedgerError;

// fund, expenses and balance, recomputed on every request
async fn get_summary(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, LedgerError> {
    validate_auth_token(&headers, &state.auth)?;
    let summary = state.ledger.compute_summary().await?;
    Ok((StatusCode::OK, Json(summary)))
}

pub fn summary_routes(state: AppState) -> Router {
    Router::new()
        .route("/summary", get(get_summary))
        .with_state(state)
}
