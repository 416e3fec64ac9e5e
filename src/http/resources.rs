//! Resource lookups used by the query editor.
//!
//! Both routes accept every method but only answer GET: anything else gets an
//! empty 200 and never reaches the provider.

use super::app_error::AppError;
use super::state::HttpServerState;
use crate::provider::models::{MetricSet, RegionInfo};
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegionsResponse {
    #[serde(rename = "cvmRegions")]
    pub cvm_regions: Vec<RegionInfo>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MetricsResponse {
    pub metrics: Vec<MetricSet>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MetricsQuery {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub region: String,
}

fn ignored(method: &Method) -> Option<Response> {
    if method == Method::GET {
        return None;
    }
    debug!(%method, "Ignoring non-GET resource call");
    Some(StatusCode::OK.into_response())
}

/// List regions
///
/// Lists the CVM regions visible with the configured credentials.
#[utoipa::path(
    get,
    path = "/cvm-regions",
    tag = "Resources",
    responses(
        (status = 200, description = "Available regions", body = RegionsResponse),
        (status = 400, description = "Lookup failed", body = AppError),
    )
)]
pub async fn cvm_regions(
    method: Method,
    State(state): State<HttpServerState>,
) -> Result<Response, AppError> {
    if let Some(response) = ignored(&method) {
        return Ok(response);
    }

    let datasource = &state.datasource;
    let regions = datasource
        .list_regions(datasource.settings())
        .await
        .map_err(AppError::from_bridge)?;

    Ok(Json(RegionsResponse {
        cvm_regions: regions,
    })
    .into_response())
}

/// List metrics
///
/// Lists the metric descriptors of a namespace in a region.
#[utoipa::path(
    get,
    path = "/monitor/describeBaseMetrics",
    tag = "Resources",
    params(
        ("namespace" = String, Query, description = "Provider namespace", example = "QCE/CVM"),
        ("region" = String, Query, description = "Region of the monitor client", example = "ap-guangzhou"),
    ),
    responses(
        (status = 200, description = "Metric descriptors", body = MetricsResponse),
        (status = 400, description = "Malformed query string or lookup failed", body = AppError),
        (status = 500, description = "Serialization failure", body = AppError),
    )
)]
pub async fn describe_base_metrics(
    method: Method,
    State(state): State<HttpServerState>,
    query: Result<Query<MetricsQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    if let Some(response) = ignored(&method) {
        return Ok(response);
    }
    let Query(query) = query.map_err(|rejection| {
        AppError::bad_request(anyhow::anyhow!(rejection.body_text()))
    })?;

    let datasource = &state.datasource;
    let metrics = datasource
        .list_metrics(datasource.settings(), &query.namespace, &query.region)
        .await
        .map_err(AppError::from_bridge)?;

    Ok(Json(MetricsResponse { metrics }).into_response())
}
