//! Provider capability injected into the data source.
//!
//! The data source never talks to the network directly: it asks a
//! [`ProviderFactory`] for a fresh [`MonitorProvider`] on every call, built
//! from the credentials of that request.

use crate::error::BridgeError;
use crate::settings::Credentials;
use async_trait::async_trait;
use std::fmt::Debug;

pub mod models;
pub mod signing;
pub mod tencentcloud;

use models::{GetMonitorDataRequest, GetMonitorDataResponse, MetricSet, RegionInfo};

#[async_trait]
pub trait MonitorProvider: Send + Sync {
    async fn list_regions(&self) -> Result<Vec<RegionInfo>, BridgeError>;

    async fn list_metrics(&self, namespace: &str) -> Result<Vec<MetricSet>, BridgeError>;

    async fn list_metric_names(&self, namespace: &str) -> Result<Vec<String>, BridgeError> {
        Ok(self
            .list_metrics(namespace)
            .await?
            .into_iter()
            .map(|metric| metric.metric_name)
            .collect())
    }

    async fn fetch_monitor_data(
        &self,
        request: &GetMonitorDataRequest,
    ) -> Result<GetMonitorDataResponse, BridgeError>;
}

pub trait ProviderFactory: Send + Sync + Debug {
    fn connect(
        &self,
        credentials: Credentials,
        region: &str,
    ) -> Result<Box<dyn MonitorProvider>, BridgeError>;
}
