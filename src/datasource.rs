//! Host-independent data source: query batches, resource lookups and health.
//!
//! The host runtime only ever talks to [`MonitorDatasource`]. Credentials are
//! loaded from the instance settings on every call, and a fresh provider
//! client is built for every query or lookup.

use crate::config::BridgeConfig;
use crate::datamodel::Frame;
use crate::datamodel::query::{
    DataQuery, DataResponse, QueryDataRequest, QueryDataResponse, QueryModel, TimeRange,
};
use crate::datamodel::transformer::{transform_monitor_data, transform_monitor_data_per_series};
use crate::datamodel::translator::translate_query;
use crate::error::BridgeError;
use crate::provider::ProviderFactory;
use crate::provider::models::{MetricSet, RegionInfo};
use crate::settings::{DataSourceInstanceSettings, load_credentials};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};
use utoipa::ToSchema;

#[derive(Debug, Clone)]
pub struct DatasourceOptions {
    /// Region of the client used for the region lookup
    pub regions_lookup_region: String,
    /// Maximum number of queries of a batch running at the same time
    pub query_concurrency: usize,
}

impl Default for DatasourceOptions {
    fn default() -> Self {
        Self {
            regions_lookup_region: "ap-guangzhou".to_string(),
            query_concurrency: 1,
        }
    }
}

impl From<&BridgeConfig> for DatasourceOptions {
    fn from(config: &BridgeConfig) -> Self {
        Self {
            regions_lookup_region: config.regions_lookup_region.clone(),
            query_concurrency: config.query_concurrency.max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CheckHealthResult {
    pub status: HealthStatus,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct MonitorDatasource {
    factory: Arc<dyn ProviderFactory>,
    settings: Arc<DataSourceInstanceSettings>,
    options: DatasourceOptions,
}

impl MonitorDatasource {
    /// Instance creation, with the settings the host configured for it.
    pub fn new(
        factory: Arc<dyn ProviderFactory>,
        settings: DataSourceInstanceSettings,
        options: DatasourceOptions,
    ) -> Self {
        Self {
            factory,
            settings: Arc::new(settings),
            options,
        }
    }

    pub fn settings(&self) -> &DataSourceInstanceSettings {
        &self.settings
    }

    /// Instance disposal. Nothing is held between calls, so there is nothing
    /// to release.
    pub fn dispose(&self) {
        info!("Disposing monitor data source instance");
    }

    /// Runs every query of the batch independently and keys the results by
    /// `refId`.
    pub async fn query_data(&self, request: QueryDataRequest) -> QueryDataResponse {
        let settings = request
            .plugin_context
            .and_then(|context| context.data_source_instance_settings)
            .map(Arc::new)
            .unwrap_or_else(|| self.settings.clone());
        let fallback_range = request.range;

        info!(queries = request.queries.len(), "Processing query batch");

        let settings = &settings;
        let results: Vec<(String, DataResponse)> = futures::stream::iter(request.queries)
            .map(|query| async move {
                let response = self.query(settings, &query, fallback_range).await;
                (query.ref_id, response)
            })
            .buffered(self.options.query_concurrency.max(1))
            .collect()
            .await;

        QueryDataResponse {
            results: results.into_iter().collect(),
        }
    }

    /// Runs one query. Failures are reported in the response, never raised.
    pub async fn query(
        &self,
        settings: &DataSourceInstanceSettings,
        query: &DataQuery,
        fallback_range: Option<TimeRange>,
    ) -> DataResponse {
        match self.execute_query(settings, query, fallback_range).await {
            Ok(frames) => DataResponse::from_frames(frames),
            Err(err) => {
                error!(ref_id = %query.ref_id, error = %err, "Query failed");
                DataResponse::from_error(&err)
            }
        }
    }

    async fn execute_query(
        &self,
        settings: &DataSourceInstanceSettings,
        query: &DataQuery,
        fallback_range: Option<TimeRange>,
    ) -> Result<Vec<Frame>, BridgeError> {
        if query.is_hidden() {
            debug!(ref_id = %query.ref_id, "Query is hidden, skipping");
            return Ok(Vec::new());
        }

        let model = QueryModel::from_data_query(query, fallback_range)?;

        let request = match translate_query(&model)? {
            Some(request) => request,
            None => {
                debug!(ref_id = %query.ref_id, "Query is hidden, skipping");
                return Ok(Vec::new());
            }
        };

        let credentials = load_credentials(settings)?;
        let provider = self.factory.connect(credentials, &model.region)?;

        debug!(
            ref_id = %query.ref_id,
            namespace = %request.namespace,
            metric = %request.metric_name,
            region = %model.region,
            "Fetching monitor data"
        );
        let response = provider.fetch_monitor_data(&request).await?;

        if model.split_series {
            Ok(transform_monitor_data_per_series(&response))
        } else {
            Ok(vec![transform_monitor_data(&response)])
        }
    }

    pub async fn list_regions(
        &self,
        settings: &DataSourceInstanceSettings,
    ) -> Result<Vec<RegionInfo>, BridgeError> {
        let credentials = load_credentials(settings)?;
        let provider = self
            .factory
            .connect(credentials, &self.options.regions_lookup_region)?;

        provider.list_regions().await.inspect_err(|err| {
            error!(error = %err, "Fail to list regions");
        })
    }

    pub async fn list_metrics(
        &self,
        settings: &DataSourceInstanceSettings,
        namespace: &str,
        region: &str,
    ) -> Result<Vec<MetricSet>, BridgeError> {
        let credentials = load_credentials(settings)?;
        let provider = self.factory.connect(credentials, region)?;

        provider.list_metrics(namespace).await.inspect_err(|err| {
            error!(namespace, region, error = %err, "Fail to list metrics");
        })
    }

    pub async fn list_metric_names(
        &self,
        settings: &DataSourceInstanceSettings,
        namespace: &str,
        region: &str,
    ) -> Result<Vec<String>, BridgeError> {
        let credentials = load_credentials(settings)?;
        let provider = self.factory.connect(credentials, region)?;
        provider.list_metric_names(namespace).await
    }

    /// Reports whether usable credentials are configured. No provider call is
    /// made.
    pub fn check_health(&self, settings: &DataSourceInstanceSettings) -> CheckHealthResult {
        match load_credentials(settings) {
            Ok(_) => CheckHealthResult {
                status: HealthStatus::Ok,
                message: "ok".to_string(),
            },
            Err(err) => CheckHealthResult {
                status: HealthStatus::Error,
                message: err.to_string(),
            },
        }
    }
}
