//! Tencent Cloud API 3.0 client for the CVM and Cloud Monitor services.
//!
//! Every call is a single signed JSON POST: no retry, no caching, and the
//! transport default timeout.

use super::models::{
    ApiError, DescribeBaseMetricsRequest, DescribeBaseMetricsResponse, DescribeRegionsResponse,
    GetMonitorDataRequest, GetMonitorDataResponse, MetricSet, RegionInfo,
};
use super::signing::{self, SignedRequest};
use super::{MonitorProvider, ProviderFactory};
use crate::datamodel::BridgeDateTime;
use crate::error::BridgeError;
use crate::settings::Credentials;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

const CVM_SERVICE: &str = "cvm";
const CVM_VERSION: &str = "2017-03-12";
const MONITOR_SERVICE: &str = "monitor";
const MONITOR_VERSION: &str = "2018-07-24";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResponseEnvelope {
    response: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResponseStatus {
    #[serde(default)]
    error: Option<ApiError>,
    #[serde(default)]
    request_id: Option<String>,
}

/// Unwraps the `{"Response": ...}` envelope, turning API errors into
/// provider errors.
pub fn parse_response<T: DeserializeOwned>(action: &str, body: &str) -> Result<T, BridgeError> {
    let envelope: ResponseEnvelope = serde_json::from_str(body)
        .map_err(|e| BridgeError::provider(action, format!("invalid response: {}", e)))?;

    let status: ResponseStatus = serde_json::from_value(envelope.response.clone())
        .map_err(|e| BridgeError::provider(action, format!("invalid response: {}", e)))?;
    if let Some(error) = status.error {
        return Err(BridgeError::provider(
            action,
            format!(
                "[{}] {} (RequestId: {})",
                error.code,
                error.message,
                status.request_id.as_deref().unwrap_or("unknown")
            ),
        ));
    }

    serde_json::from_value(envelope.response)
        .map_err(|e| BridgeError::provider(action, format!("invalid response: {}", e)))
}

#[derive(Debug, Clone)]
pub struct TencentCloudClient {
    http: reqwest::Client,
    credentials: Credentials,
    region: String,
    endpoint: Option<Url>,
}

impl TencentCloudClient {
    pub fn new(
        credentials: Credentials,
        region: impl Into<String>,
        endpoint: Option<Url>,
    ) -> Result<Self, BridgeError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| BridgeError::provider("create client", e))?;

        Ok(Self {
            http,
            credentials,
            region: region.into(),
            endpoint,
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    fn service_url(&self, service: &str) -> Result<Url, BridgeError> {
        match &self.endpoint {
            Some(endpoint) => Ok(endpoint.clone()),
            None => Url::parse(&format!("https://{}.tencentcloudapi.com/", service))
                .map_err(|e| BridgeError::provider(service, e)),
        }
    }

    async fn call<B, T>(
        &self,
        service: &str,
        version: &str,
        action: &str,
        body: &B,
    ) -> Result<T, BridgeError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.service_url(service)?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(BridgeError::provider(
                    action,
                    format!("invalid endpoint: {}", url),
                ));
            }
        };

        let payload = serde_json::to_string(body)?;
        let timestamp = BridgeDateTime::now()
            .map_err(|e| BridgeError::provider(action, format!("failed to read the clock: {}", e)))?
            .to_unix_seconds()
            .floor() as i64;
        let authorization = signing::authorization(
            &self.credentials,
            &SignedRequest {
                service,
                host: &host,
                payload: &payload,
                timestamp,
            },
        )?;

        debug!(action, service, region = %self.region, "Calling Tencent Cloud API");

        let mut request = self
            .http
            .post(url)
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, signing::CONTENT_TYPE)
            .header("X-TC-Action", action)
            .header("X-TC-Timestamp", timestamp.to_string())
            .header("X-TC-Version", version);
        if !self.region.is_empty() {
            request = request.header("X-TC-Region", &self.region);
        }

        let response = request
            .body(payload)
            .send()
            .await
            .map_err(|e| BridgeError::provider(action, format!("request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BridgeError::provider(action, format!("failed to read response: {}", e)))?;
        if !status.is_success() {
            return Err(BridgeError::provider(
                action,
                format!("HTTP {}: {}", status, text),
            ));
        }

        parse_response(action, &text)
    }
}

#[async_trait]
impl MonitorProvider for TencentCloudClient {
    async fn list_regions(&self) -> Result<Vec<RegionInfo>, BridgeError> {
        let response: DescribeRegionsResponse = self
            .call(
                CVM_SERVICE,
                CVM_VERSION,
                "DescribeRegions",
                &serde_json::json!({}),
            )
            .await?;
        Ok(response.region_set)
    }

    async fn list_metrics(&self, namespace: &str) -> Result<Vec<MetricSet>, BridgeError> {
        let response: DescribeBaseMetricsResponse = self
            .call(
                MONITOR_SERVICE,
                MONITOR_VERSION,
                "DescribeBaseMetrics",
                &DescribeBaseMetricsRequest { namespace },
            )
            .await?;
        Ok(response.metric_set)
    }

    async fn fetch_monitor_data(
        &self,
        request: &GetMonitorDataRequest,
    ) -> Result<GetMonitorDataResponse, BridgeError> {
        self.call(MONITOR_SERVICE, MONITOR_VERSION, "GetMonitorData", request)
            .await
    }
}

/// Builds one [`TencentCloudClient`] per call.
#[derive(Debug, Clone, Default)]
pub struct TencentCloudFactory {
    endpoint: Option<Url>,
}

impl TencentCloudFactory {
    pub fn new(endpoint: Option<Url>) -> Self {
        Self { endpoint }
    }

    pub fn from_endpoint(endpoint: Option<&str>) -> Result<Self, BridgeError> {
        let endpoint = endpoint
            .map(Url::parse)
            .transpose()
            .map_err(|e| BridgeError::configuration(format!("invalid provider endpoint: {}", e)))?;
        Ok(Self::new(endpoint))
    }
}

impl ProviderFactory for TencentCloudFactory {
    fn connect(
        &self,
        credentials: Credentials,
        region: &str,
    ) -> Result<Box<dyn MonitorProvider>, BridgeError> {
        Ok(Box::new(TencentCloudClient::new(
            credentials,
            region,
            self.endpoint.clone(),
        )?))
    }
}
