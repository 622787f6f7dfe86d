use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `OK`.
    pub status: String,
    /// Current server time, ISO 8601 in UTC.
    pub timestamp: String,
}

impl IntoResponse for HealthResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Liveness probe. Never contacts the archive.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "The server is running", body = HealthResponse))
)]
pub async fn health() -> HealthResponse {
    HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}
