use super::app_error::AppError;
use super::health::{__path_check_health, __path_liveness, check_health, liveness};
use super::query::{__path_query_data, query_data};
use super::resources::{
    __path_cvm_regions, __path_describe_base_metrics, cvm_regions, describe_base_metrics,
};
use super::state::HttpServerState;
use crate::config;
use anyhow::Result;
use axum::Json;
use axum::Router;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{StatusCode, Uri, header};
use axum::routing::{any, get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::trace;
use tower_http::{ServiceBuilderExt, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = "Bridge", description = "Tencent Cloud Monitor bridge"),
        (name = "Resources", description = "Region and metric lookups"),
        (name = "Query", description = "Metric queries"),
        (name = "Health", description = "Health checks"),
    ),
    paths(frontpage, cvm_regions, describe_base_metrics, query_data, liveness, check_health),
)]
struct ApiDoc;

/// Routes shared by the server and the tests.
pub fn build_app_routes(state: HttpServerState, max_body_layer: DefaultBodyLimit) -> Router {
    Router::new()
        .route("/", get(frontpage))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .route("/cvm-regions", any(cvm_regions))
        .route("/monitor/describeBaseMetrics", any(describe_base_metrics))
        .route("/query", post(query_data).layer(max_body_layer))
        .route("/health/live", get(liveness))
        .route("/health", get(check_health))
        .fallback(not_found)
        .with_state(state)
}

pub async fn run_http_server(state: HttpServerState, address: SocketAddr) -> Result<()> {
    let config = config::get()?;
    let max_body_layer = DefaultBodyLimit::max(config.parse_http_body_limit()?);
    let timeout_seconds = config.http_server_timeout_seconds;

    // List of headers that shouldn't be logged
    let sensitive_headers: Arc<[_]> = vec![header::AUTHORIZATION, header::COOKIE].into();

    // Middleware creation
    let middleware = ServiceBuilder::new()
        .sensitive_request_headers(sensitive_headers.clone())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .sensitive_response_headers(sensitive_headers)
        .layer(timeout_layer(timeout_seconds))
        .compression()
        .into_inner();

    let app = build_app_routes(state, max_body_layer).layer(middleware);

    info!(%address, "HTTP server listening");
    let listener = tokio::net::TcpListener::bind(address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn timeout_layer(timeout_seconds: u64) -> TimeoutLayer {
    TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        Duration::from_secs(timeout_seconds),
    )
}

async fn shutdown_signal() {
    // Wait for the CTRL+C signal
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install the CTRL+C signal handler");
    }
    info!("Shutting down the HTTP server");
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Bridge",
    responses(
        (status = 200, description = "Bridge name", body = String)
    )
)]
async fn frontpage(State(state): State<HttpServerState>) -> Result<Json<String>, AppError> {
    let name: String = (*state.name).clone();
    Ok(Json(name))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(anyhow::anyhow!("No route for {}", uri.path()))
}
