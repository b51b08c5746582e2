use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use repair_advisor::decision::{evaluate_csv, BatchRow, DecisionInput, DecisionOutput};
use repair_advisor::error::AppError;
use serde::Serialize;
use serde_json::json;
use tracing::info;

#[derive(Debug, Serialize)]
pub(crate) struct DecisionResponse {
    pub(crate) evaluated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub(crate) decision: DecisionOutput,
}

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/decisions", post(decision_endpoint))
        .route("/api/v1/decisions/batch", post(batch_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn decision_endpoint(
    Extension(state): Extension<AppState>,
    Json(input): Json<DecisionInput>,
) -> Json<DecisionResponse> {
    let decision = state.engine.evaluate(&input);
    Json(DecisionResponse {
        evaluated_at: Utc::now(),
        decision,
    })
}

/// Accepts a CSV document as the raw request body.
pub(crate) async fn batch_endpoint(
    Extension(state): Extension<AppState>,
    body: String,
) -> Result<Json<Vec<BatchRow>>, AppError> {
    let rows = evaluate_csv(&state.engine, body.as_bytes())?;
    info!(rows = rows.len(), "batch evaluated");
    Ok(Json(rows))
}
