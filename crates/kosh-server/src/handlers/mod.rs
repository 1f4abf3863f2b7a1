//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area. Bodies go
//! through [`kosh_core::wire`] in both directions.

pub mod audit;
pub mod loans;
pub mod recurring;
pub mod reports;
pub mod transactions;

// Re-export all handlers for use in router
pub use audit::*;
pub use loans::*;
pub use recurring::*;
pub use reports::*;
pub use transactions::*;

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{get_user_email, AppError, AppState};
use kosh_core::wire::{self, Entity};

/// Serialize a model into its camelCase response body
pub(crate) fn wire_json<T: Serialize>(entity: Entity, model: &T) -> Result<Json<Value>, AppError> {
    Ok(Json(wire::serialize(entity, model)?))
}

/// Read a camelCase request body into a model
pub(crate) fn parse_body<T: DeserializeOwned>(entity: Entity, body: Value) -> Result<T, AppError> {
    wire::deserialize(entity, body)
        .map_err(|e| AppError::bad_request(&format!("Invalid request body: {}", e)))
}

/// GET /api/health - Liveness check
pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let user_email = get_user_email(&state.config);
    state.db.log_audit(&user_email, "health", None, None, None)?;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
