use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Multipart, Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::{
    utils::{envelope, validate_auth_token},
    AppState,
};
use crate::db::contribution::PaymentMethod;
use crate::error::LedgerError;
use crate::ledger::{access, validate, ContributionSubmission, ManualContribution};

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualContributionRequest {
    pub user_id: Uuid,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub reference_id: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub status: String,
    pub rejected_reason: Option<String>,
}

// approved rows for everyone, other statuses for admins only
async fn list_contributions(
    headers: HeaderMap,
    State(state): State<AppState>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> Result<impl IntoResponse, LedgerError> {
    let identity = validate_auth_token(&headers, &state.auth)?;
    let Query(query) = query?;

    let rows = state
        .ledger
        .list_contributions(&identity, query.status.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(rows)))
}

async fn list_my_contributions(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, LedgerError> {
    let identity = validate_auth_token(&headers, &state.auth)?;
    let rows = state.ledger.list_my_contributions(&identity).await?;
    Ok((StatusCode::OK, Json(rows)))
}

async fn add_manual_contribution(
    headers: HeaderMap,
    State(state): State<AppState>,
    payload: Result<Json<ManualContributionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, LedgerError> {
    let identity = validate_auth_token(&headers, &state.auth)?;
    access::require_admin(&identity, "record manual contributions")?;
    let Json(payload) = payload?;

    let contribution = state
        .ledger
        .record_manual_contribution(
            &identity,
            ManualContribution {
                user_id: payload.user_id,
                amount: payload.amount,
                method: payload.method,
                reference_id: payload.reference_id,
                note: payload.note,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(contribution)))
}

#[derive(Default)]
struct SubmissionForm {
    amount: Option<String>,
    method: Option<String>,
    reference_id: Option<String>,
    month: Option<String>,
    screenshot: Option<(Option<String>, Vec<u8>)>,
}

async fn read_submission_form(mut multipart: Multipart) -> Result<SubmissionForm, LedgerError> {
    let mut form = SubmissionForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "screenshot" => {
                let file_name = field.file_name().map(str::to_string);
                let data = field.bytes().await?;
                form.screenshot = Some((file_name, data.to_vec()));
            }
            "amount" => form.amount = Some(field.text().await?),
            "method" => form.method = Some(field.text().await?),
            "referenceId" => form.reference_id = Some(field.text().await?),
            "month" => form.month = Some(field.text().await?),
            _ => tracing::debug!("ignoring unexpected form field: {name}"),
        }
    }
    Ok(form)
}

// member submission with a payment screenshot, reviewed later by an admin
async fn add_user_contribution(
    headers: HeaderMap,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, LedgerError> {
    let identity = validate_auth_token(&headers, &state.auth)?;
    let form = read_submission_form(multipart?).await?;

    let amount = validate::parse_amount(form.amount.as_deref().unwrap_or_default())?;
    let method = validate::parse_method(form.method.as_deref().unwrap_or_default())?;
    let month = validate::check_month(form.month)?;
    let reference_id = validate::reference_id(form.reference_id)?;
    let Some((file_name, data)) = form.screenshot else {
        return Err(LedgerError::validation("Payment screenshot is required"));
    };

    let screenshot_url = state.screenshots.save(file_name.as_deref(), &data).await?;

    let submitted = state
        .ledger
        .submit_contribution(
            &identity,
            ContributionSubmission {
                amount,
                method,
                reference_id,
                month,
                screenshot_url: Some(screenshot_url.clone()),
            },
        )
        .await;

    match submitted {
        Ok(contribution) => Ok((
            StatusCode::CREATED,
            envelope("Contribution submitted for approval", contribution),
        )),
        Err(err) => {
            state.screenshots.discard(&screenshot_url).await;
            Err(err)
        }
    }
}

async fn update_contribution_status(
    headers: HeaderMap,
    State(state): State<AppState>,
    contribution_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, LedgerError> {
    let identity = validate_auth_token(&headers, &state.auth)?;
    access::require_admin(&identity, "approve or reject contributions")?;
    let Path(contribution_id) =
        contribution_id.map_err(|_| LedgerError::validation("Invalid contribution id"))?;
    let Json(payload) = payload?;

    let contribution = state
        .ledger
        .resolve_contribution(
            &identity,
            contribution_id,
            &payload.status,
            payload.rejected_reason,
        )
        .await?;

    let message = format!("Contribution {} successfully", contribution.status);
    Ok((StatusCode::OK, envelope(message, contribution)))
}

pub fn contribution_routes(state: AppState) -> Router {
    Router::new()
        .route("/contributions", get(list_contributions))
        .route("/contributions/me", get(list_my_contributions))
        .route("/contributions/manual", post(add_manual_contribution))
        .route("/contributions/user", post(add_user_contribution))
        .route("/contributions/:id/status", put(update_contribution_status))
        .with_state(state)
}
