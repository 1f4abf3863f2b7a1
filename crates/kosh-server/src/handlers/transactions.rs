//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use super::{parse_body, wire_json};
use crate::{get_user_email, AppError, AppState, SuccessResponse, MAX_PAGE_LIMIT};
use kosh_core::import::generate_hash;
use kosh_core::models::NewTransaction;
use kosh_core::wire::{self, Entity};

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Request body for adding a single transaction
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub category: Option<String>,
}

/// GET /api/transactions - List transactions, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionQuery>,
) -> Result<Json<Value>, AppError> {
    let user_email = get_user_email(&state.config);

    // Input validation: clamp pagination parameters
    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);
    let offset = params.offset.max(0);

    let transactions = state.db.list_transactions(limit, offset)?;
    let total = state.db.count_transactions()?;

    state.db.log_audit(
        &user_email,
        "list",
        Some("transaction"),
        None,
        Some(&format!(
            "limit={}, offset={}, count={}",
            limit,
            offset,
            transactions.len()
        )),
    )?;

    Ok(Json(serde_json::json!({
        "transactions": wire::serialize(Entity::Transaction, &transactions)?,
        "total": total,
        "limit": limit,
        "offset": offset,
    })))
}

/// POST /api/transactions - Add one transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let user_email = get_user_email(&state.config);
    let req: CreateTransactionRequest = parse_body(Entity::Transaction, body)?;

    if req.description.trim().is_empty() {
        return Err(AppError::bad_request("Description is required"));
    }

    let tx = NewTransaction {
        import_hash: generate_hash(&req.date, &req.description, req.amount, 0),
        date: req.date,
        description: req.description.trim().to_string(),
        amount: req.amount,
        category: req.category,
    };

    let id = state
        .db
        .insert_transaction(&tx)?
        .ok_or_else(|| AppError::conflict("Transaction already exists"))?;

    state.db.log_audit(
        &user_email,
        "create",
        Some("transaction"),
        Some(id),
        Some(&format!("date={}, amount={}", tx.date, tx.amount)),
    )?;

    let created = state
        .db
        .get_transaction(id)?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;

    wire_json(Entity::Transaction, &created)
}

/// DELETE /api/transactions/:id - Delete a transaction
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_email = get_user_email(&state.config);

    state.db.delete_transaction(id)?;

    state
        .db
        .log_audit(&user_email, "delete", Some("transaction"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}
