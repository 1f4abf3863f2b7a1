//! Recurring payment handlers (declared SIPs, subscriptions, bills)

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use super::{parse_body, wire_json};
use crate::{get_user_email, AppError, AppState, SuccessResponse};
use kosh_core::detect::RecurrenceDetector;
use kosh_core::models::NewRecurringPayment;
use kosh_core::wire::Entity;

/// GET /api/recurring - List declared recurring payments
pub async fn list_recurring(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let user_email = get_user_email(&state.config);

    let payments = state.db.list_recurring()?;

    state.db.log_audit(
        &user_email,
        "list",
        Some("recurring_payment"),
        None,
        Some(&format!("count={}", payments.len())),
    )?;

    wire_json(Entity::RecurringPayment, &payments)
}

/// POST /api/recurring - Declare a recurring payment
pub async fn declare_recurring(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let user_email = get_user_email(&state.config);
    let payment: NewRecurringPayment = parse_body(Entity::RecurringPayment, body)?;

    let id = state.db.declare_recurring(&payment)?;

    state.db.log_audit(
        &user_email,
        "create",
        Some("recurring_payment"),
        Some(id),
        Some(&format!(
            "description={}, amount={}, kind={}",
            payment.description, payment.amount, payment.kind
        )),
    )?;

    let created = state
        .db
        .list_recurring()?
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| AppError::not_found("Recurring payment not found"))?;

    wire_json(Entity::RecurringPayment, &created)
}

/// DELETE /api/recurring/:id - Remove a declaration
pub async fn delete_recurring(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_email = get_user_email(&state.config);

    state.db.delete_recurring(id)?;

    state.db.log_audit(
        &user_email,
        "delete",
        Some("recurring_payment"),
        Some(id),
        None,
    )?;

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/recurring/suggestions - Detected recurring charges not yet declared
pub async fn recurring_suggestions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let user_email = get_user_email(&state.config);

    let records = state.db.all_transaction_records()?;
    let detector = RecurrenceDetector::with_config(state.analysis.detection.clone());
    let detected = detector.detect(&records);
    let detected_count = detected.len();
    let suggestions = state.db.filter_undeclared(detected)?;

    state.db.log_audit(
        &user_email,
        "detect",
        Some("recurring_payment"),
        None,
        Some(&format!(
            "transactions={}, detected={}, undeclared={}",
            records.len(),
            detected_count,
            suggestions.len()
        )),
    )?;

    wire_json(Entity::RecurrenceSuggestion, &suggestions)
}
