use super::app_error::AppError;
use super::state::HttpServerState;
use crate::datamodel::query::{QueryDataRequest, QueryDataResponse};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

/// Query data
///
/// Runs a batch of metric queries. Every query gets its own entry in
/// `results`, keyed by `refId`, with either frames or an error.
#[utoipa::path(
    post,
    path = "/query",
    tag = "Query",
    request_body(
        description = "Batch of queries, with an optional plugin context and default time range",
        content_type = "application/json",
    ),
    responses(
        (status = 200, description = "Per-query results keyed by refId"),
        (status = 400, description = "Malformed request body", body = AppError),
    )
)]
pub async fn query_data(
    State(state): State<HttpServerState>,
    payload: Result<Json<QueryDataRequest>, JsonRejection>,
) -> Result<Json<QueryDataResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::bad_request(anyhow::anyhow!(e.body_text())))?;
    Ok(Json(state.datasource.query_data(request).await))
}
