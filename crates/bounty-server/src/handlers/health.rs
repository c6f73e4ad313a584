//! Liveness probe.

use axum::Json;

use crate::schema::common::HealthResponse;

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
