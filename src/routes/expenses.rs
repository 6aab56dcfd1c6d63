use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::{utils::validate_auth_token, AppState};
use crate::error::LedgerError;
use crate::ledger::{access, ExpenseEntry};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRequest {
    pub amount: Decimal,
    pub purpose: Option<String>,
    pub withdrawn_by_user_id: Option<Uuid>,
    pub receipt_url: Option<String>,
    pub note: Option<String>,
}

async fn add_expense(
    headers: HeaderMap,
    State(state): State<AppState>,
    payload: Result<Json<ExpenseRequest>, JsonRejection>,
) -> Result<impl IntoResponse, LedgerError> {
    let identity = validate_auth_token(&headers, &state.auth)?;
    access::require_admin(&identity, "record expenses")?;
    let Json(payload) = payload?;

    let expense = state
        .ledger
        .record_expense(
            &identity,
            ExpenseEntry {
                amount: payload.amount,
                purpose: payload.purpose,
                withdrawn_by_user_id: payload.withdrawn_by_user_id,
                receipt_url: payload.receipt_url,
                note: payload.note,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

// expenses are visible to every signed-in member
async fn list_expenses(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, LedgerError> {
    validate_auth_token(&headers, &state.auth)?;
    let expenses = state.ledger.list_expenses().await?;
    Ok((StatusCode::OK, Json(expenses)))
}

pub fn expense_routes(state: AppState) -> Router {
    Router::new()
        .route("/expenses", get(list_expenses).post(add_expense))
        .with_state(state)
}
