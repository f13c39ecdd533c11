use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::LoanType;
use super::pipeline::{DecisionNotifier, ProcessingOutcome};
use super::report::{FailedReport, ProcessedReport};
use super::repository::LoanRepository;
use super::service::LoanDesk;
use crate::error::AppError;

/// Inbound application payload. A `null` or missing name is treated as empty.
#[derive(Debug, Clone, Deserialize)]
pub struct LoanSubmissionRequest {
    pub loan_type: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    pub amount: f64,
}

/// Router builder exposing intake, review views, and the audit registry.
///
/// Unknown loan types answer 400 and intake errors 422. JSON cannot carry NaN or
/// infinities, so a non-finite amount only reaches the desk through direct handler
/// calls; over the wire axum's extractor refuses the body first.
pub fn loan_router<R, N>(desk: Arc<LoanDesk<R, N>>) -> Router
where
    R: LoanRepository + 'static,
    N: DecisionNotifier + 'static,
{
    Router::new()
        .route("/api/v1/loans", post(submit_handler::<R, N>))
        .route("/api/v1/loans/processed", get(processed_handler::<R, N>))
        .route("/api/v1/loans/failed", get(failed_handler::<R, N>))
        .route("/api/v1/audit/operations", get(audit_handler::<R, N>))
        .with_state(desk)
}

pub(crate) async fn submit_handler<R, N>(
    State(desk): State<Arc<LoanDesk<R, N>>>,
    Json(request): Json<LoanSubmissionRequest>,
) -> Result<(StatusCode, Json<ProcessingOutcome>), AppError>
where
    R: LoanRepository + 'static,
    N: DecisionNotifier + 'static,
{
    let loan_type = request.loan_type.parse::<LoanType>()?;
    let customer_name = request.customer_name.unwrap_or_default();

    let outcome = desk.submit_with_outcome(loan_type, &customer_name, request.amount)?;
    Ok((StatusCode::ACCEPTED, Json(outcome)))
}

pub(crate) async fn processed_handler<R, N>(
    State(desk): State<Arc<LoanDesk<R, N>>>,
) -> Result<Json<ProcessedReport>, AppError>
where
    R: LoanRepository + 'static,
    N: DecisionNotifier + 'static,
{
    Ok(Json(desk.processed_view()?))
}

pub(crate) async fn failed_handler<R, N>(
    State(desk): State<Arc<LoanDesk<R, N>>>,
) -> Result<Json<FailedReport>, AppError>
where
    R: LoanRepository + 'static,
    N: DecisionNotifier + 'static,
{
    Ok(Json(desk.failed_view()?))
}

pub(crate) async fn audit_handler<R, N>(State(desk): State<Arc<LoanDesk<R, N>>>) -> Json<Value>
where
    R: LoanRepository + 'static,
    N: DecisionNotifier + 'static,
{
    Json(json!({ "operations": desk.auditable_operations() }))
}
