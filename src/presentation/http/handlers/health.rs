//! Health Check Handlers

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::startup::AppState;

/// Basic health check
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Readiness check: verifies the database connection
pub async fn readiness(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    sqlx::query("SELECT 1")
        .execute(&state.db)
        .await
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;

    Ok(Json(json!({
        "status": "ready",
        "sessions": state.gateway.session_count(),
    })))
}
