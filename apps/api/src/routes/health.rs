use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a status object with service version and uptime.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let uptime = Utc::now() - state.started_at;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "ats-api",
        "started_at": state.started_at.to_rfc3339(),
        "uptime_seconds": uptime.num_seconds(),
        "vocabulary_size": state.vocabulary.len()
    }))
}

/// GET /api/resume/health
/// Plain-text liveness check used by the browser client.
pub async fn resume_health_handler() -> &'static str {
    "ATS Checker Backend is running"
}
