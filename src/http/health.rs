use super::state::HttpServerState;
use crate::datasource::CheckHealthResult;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Liveness check
///
/// Checks if the service is running.
/// This endpoint always returns 200 OK if the server is able to respond.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
        }),
    )
}

/// Data source health check
///
/// Reports whether the configured credentials can be loaded.
/// The provider is never contacted.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Health check result", body = CheckHealthResult)
    )
)]
pub async fn check_health(State(state): State<HttpServerState>) -> Json<CheckHealthResult> {
    let datasource = &state.datasource;
    Json(datasource.check_health(datasource.settings()))
}
