use crate::datasource::{DatasourceOptions, MonitorDatasource};
use crate::http::server::build_app_routes;
use crate::http::state::HttpServerState;
use crate::provider::ProviderFactory;
use crate::settings::DataSourceInstanceSettings;
/// HTTP testing utilities
use anyhow::Result;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderMap, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot` and `ready`

/// HTTP test client for making requests to our app
pub struct TestApp {
    app: axum::Router,
}

impl TestApp {
    /// Create a new test app around the provided provider factory
    pub fn new(factory: Arc<dyn ProviderFactory>, settings: DataSourceInstanceSettings) -> Self {
        Self::with_options(factory, settings, DatasourceOptions::default())
    }

    pub fn with_options(
        factory: Arc<dyn ProviderFactory>,
        settings: DataSourceInstanceSettings,
        options: DatasourceOptions,
    ) -> Self {
        let state = HttpServerState {
            name: Arc::new("Bridge Test".to_string()),
            datasource: Arc::new(MonitorDatasource::new(factory, settings, options)),
        };

        // Use the shared route builder from the main server
        // This ensures tests use the exact same routes as production
        let max_body_layer = DefaultBodyLimit::max(10 * 1024 * 1024); // 10MB for tests
        let app = build_app_routes(state, max_body_layer);

        Self { app }
    }

    /// Send a POST request with JSON data
    pub async fn post_json(&self, path: &str, json_data: &str) -> Result<TestResponse> {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(json_data.to_string()))?;

        let response = self.app.clone().oneshot(request).await?;
        Ok(TestResponse::new(response).await)
    }

    /// Send a GET request
    pub async fn get(&self, path: &str) -> Result<TestResponse> {
        self.request("GET", path).await
    }

    /// Send a body-less request with any method
    pub async fn request(&self, method: &str, path: &str) -> Result<TestResponse> {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())?;

        let response = self.app.clone().oneshot(request).await?;
        Ok(TestResponse::new(response).await)
    }
}

/// Test response wrapper for easier assertions
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl TestResponse {
    async fn new(response: axum::response::Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        let body = String::from_utf8_lossy(&body_bytes).to_string();

        Self {
            status,
            headers,
            body,
        }
    }

    /// Get response status
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get response body as string
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Check if response was successful (2xx)
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Parse response body as JSON
    pub fn json<T>(&self) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_str(&self.body).map_err(Into::into)
    }

    /// Assert status code
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {}, got {}. Body: {}",
            expected, self.status, self.body
        );
        self
    }

    /// Assert response body contains text
    pub fn assert_body_contains(&self, text: &str) -> &Self {
        assert!(
            self.body.contains(text),
            "Expected body to contain '{}', but body was: {}",
            text,
            self.body
        );
        self
    }

    /// Get response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Assert content-type header
    pub fn assert_content_type(&self, expected: &str) -> &Self {
        let actual = self
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("<missing>");
        assert_eq!(
            actual, expected,
            "Expected content-type to be '{}', but was '{}'",
            expected, actual
        );
        self
    }
}
