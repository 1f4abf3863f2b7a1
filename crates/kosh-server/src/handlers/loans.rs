//! Loan handlers and payoff projection

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::{parse_body, wire_json};
use crate::{get_user_email, AppError, AppState, SuccessResponse};
use kosh_core::models::{LoanStatus, NewLoan};
use kosh_core::payoff::simulate_avalanche_schedule;
use kosh_core::wire::Entity;

/// Query parameters for listing loans
#[derive(Debug, Deserialize)]
pub struct LoanQuery {
    /// "active" or "closed"; all loans when absent
    pub status: Option<String>,
}

/// GET /api/loans - List loans, highest rate first
pub async fn list_loans(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LoanQuery>,
) -> Result<Json<Value>, AppError> {
    let user_email = get_user_email(&state.config);

    let status: Option<LoanStatus> = params
        .status
        .as_deref()
        .map(str::parse::<LoanStatus>)
        .transpose()
        .map_err(|e: String| AppError::bad_request(&e))?;

    let loans = state.db.list_loans(status)?;

    state.db.log_audit(
        &user_email,
        "list",
        Some("loan"),
        None,
        Some(&format!("status={:?}, count={}", params.status, loans.len())),
    )?;

    wire_json(Entity::Loan, &loans)
}

/// POST /api/loans - Create a loan
pub async fn create_loan(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let user_email = get_user_email(&state.config);
    let new_loan: NewLoan = parse_body(Entity::Loan, body)?;

    let id = state.db.create_loan(&new_loan)?;

    state.db.log_audit(
        &user_email,
        "create",
        Some("loan"),
        Some(id),
        Some(&format!(
            "name={}, rate={}, emi={}",
            new_loan.name, new_loan.interest_rate, new_loan.emi_amount
        )),
    )?;

    let loan = state
        .db
        .get_loan(id)?
        .ok_or_else(|| AppError::not_found("Loan not found"))?;

    wire_json(Entity::Loan, &loan)
}

/// Request body for recording a new outstanding balance
#[derive(Debug, Deserialize)]
pub struct UpdateLoanRequest {
    pub remaining_amount: f64,
}

/// PATCH /api/loans/:id - Record a new balance (e.g. after a prepayment)
pub async fn update_loan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let user_email = get_user_email(&state.config);
    let req: UpdateLoanRequest = parse_body(Entity::Loan, body)?;

    state.db.update_loan_balance(id, req.remaining_amount)?;

    state.db.log_audit(
        &user_email,
        "update",
        Some("loan"),
        Some(id),
        Some(&format!("remaining={}", req.remaining_amount)),
    )?;

    let loan = state
        .db
        .get_loan(id)?
        .ok_or_else(|| AppError::not_found("Loan not found"))?;

    wire_json(Entity::Loan, &loan)
}

/// POST /api/loans/:id/close - Mark a loan as paid off
pub async fn close_loan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let user_email = get_user_email(&state.config);

    state.db.close_loan(id)?;

    state
        .db
        .log_audit(&user_email, "close", Some("loan"), Some(id), None)?;

    let loan = state
        .db
        .get_loan(id)?
        .ok_or_else(|| AppError::not_found("Loan not found"))?;

    wire_json(Entity::Loan, &loan)
}

/// DELETE /api/loans/:id - Delete a loan
pub async fn delete_loan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_email = get_user_email(&state.config);

    state.db.delete_loan(id)?;

    state
        .db
        .log_audit(&user_email, "delete", Some("loan"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// Query parameters for the payoff projection
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffQuery {
    /// Extra amount paid each month on top of the EMIs
    #[serde(default)]
    pub extra_monthly: f64,
    /// Include the month-by-month trail
    #[serde(default)]
    pub schedule: bool,
}

/// GET /api/loans/payoff - Avalanche projection over active loans
pub async fn project_payoff(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PayoffQuery>,
) -> Result<Json<Value>, AppError> {
    let user_email = get_user_email(&state.config);

    let loans = state.db.active_loan_records()?;
    let projection =
        simulate_avalanche_schedule(&loans, params.extra_monthly, &state.analysis.payoff);

    state.db.log_audit(
        &user_email,
        "payoff",
        Some("loan"),
        None,
        Some(&format!(
            "loans={}, extra={}, months={}, capped={}",
            loans.len(),
            params.extra_monthly,
            projection.result.months,
            projection.capped
        )),
    )?;

    if params.schedule {
        wire_json(Entity::PayoffSchedule, &projection)
    } else {
        wire_json(Entity::PayoffResult, &projection.result)
    }
}
