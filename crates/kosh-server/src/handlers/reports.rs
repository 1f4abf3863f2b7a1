//! Report handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::Value;

use super::wire_json;
use crate::{get_user_email, AppError, AppState};
use kosh_core::db::resolve_report_range;
use kosh_core::wire::Entity;

#[derive(Debug, Deserialize)]
pub struct CashFlowQuery {
    /// Start date (YYYY-MM-DD), defaults to twelve months back
    pub from: Option<NaiveDate>,
    /// End date (YYYY-MM-DD), defaults to today
    pub to: Option<NaiveDate>,
}

/// GET /api/reports/cash-flow - Monthly income, spending and net
pub async fn report_cash_flow(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CashFlowQuery>,
) -> Result<Json<Value>, AppError> {
    let user_email = get_user_email(&state.config);

    let today = Local::now().date_naive();
    let (from, to) = resolve_report_range(params.from, params.to, today)?;
    let months = state.db.monthly_cash_flow(from, to)?;

    state.db.log_audit(
        &user_email,
        "report",
        Some("cash_flow"),
        None,
        Some(&format!("from={}, to={}, months={}", from, to, months.len())),
    )?;

    wire_json(Entity::CashFlowMonth, &months)
}
