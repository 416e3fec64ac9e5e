//! In-memory provider used by unit and integration tests.

use crate::error::BridgeError;
use crate::provider::models::{
    GetMonitorDataRequest, GetMonitorDataResponse, MetricSet, RegionInfo,
};
use crate::provider::{MonitorProvider, ProviderFactory};
use crate::settings::Credentials;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub mod http;

/// Every call that reached the fake provider, with the region of its client.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    ListRegions {
        region: String,
    },
    ListMetrics {
        region: String,
        namespace: String,
    },
    FetchMonitorData {
        region: String,
        request: GetMonitorDataRequest,
    },
}

#[derive(Debug, Default)]
struct FakeState {
    regions: Vec<RegionInfo>,
    metrics: Vec<MetricSet>,
    monitor_data: HashMap<String, GetMonitorDataResponse>,
    failing_namespaces: HashSet<String>,
    malformed_namespaces: HashSet<String>,
    calls: Vec<ProviderCall>,
    secret_ids: Vec<String>,
}

/// Provider factory answering from canned data.
///
/// Monitor data is keyed by metric name. Unknown metrics get an empty
/// response.
#[derive(Debug, Clone, Default)]
pub struct FakeProviderFactory {
    state: Arc<Mutex<FakeState>>,
}

impl FakeProviderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_regions(self, regions: Vec<RegionInfo>) -> Self {
        self.state.lock().unwrap().regions = regions;
        self
    }

    pub fn with_metrics(self, metrics: Vec<MetricSet>) -> Self {
        self.state.lock().unwrap().metrics = metrics;
        self
    }

    pub fn with_monitor_data(self, response: GetMonitorDataResponse) -> Self {
        self.state
            .lock()
            .unwrap()
            .monitor_data
            .insert(response.metric_name.clone(), response);
        self
    }

    /// Every call touching this namespace fails with a provider error.
    pub fn with_failing_namespace(self, namespace: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_namespaces
            .insert(namespace.to_string());
        self
    }

    /// Every call touching this namespace fails to decode its answer.
    pub fn with_malformed_namespace(self, namespace: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .malformed_namespaces
            .insert(namespace.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Secret ids of every client built so far.
    pub fn connected_secret_ids(&self) -> Vec<String> {
        self.state.lock().unwrap().secret_ids.clone()
    }
}

impl ProviderFactory for FakeProviderFactory {
    fn connect(
        &self,
        credentials: Credentials,
        region: &str,
    ) -> Result<Box<dyn MonitorProvider>, BridgeError> {
        self.state
            .lock()
            .unwrap()
            .secret_ids
            .push(credentials.secret_id);
        Ok(Box::new(FakeProvider {
            state: self.state.clone(),
            region: region.to_string(),
        }))
    }
}

struct FakeProvider {
    state: Arc<Mutex<FakeState>>,
    region: String,
}

impl FakeProvider {
    fn check_namespace(
        state: &FakeState,
        action: &str,
        namespace: &str,
    ) -> Result<(), BridgeError> {
        if state.failing_namespaces.contains(namespace) {
            return Err(BridgeError::provider(
                action,
                format!("[InternalError] namespace {} is unavailable", namespace),
            ));
        }
        if state.malformed_namespaces.contains(namespace) {
            let err = serde_json::from_str::<serde_json::Value>(r#"{"Response":"#).unwrap_err();
            return Err(BridgeError::from(err));
        }
        Ok(())
    }
}

#[async_trait]
impl MonitorProvider for FakeProvider {
    async fn list_regions(&self) -> Result<Vec<RegionInfo>, BridgeError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ProviderCall::ListRegions {
            region: self.region.clone(),
        });
        Ok(state.regions.clone())
    }

    async fn list_metrics(&self, namespace: &str) -> Result<Vec<MetricSet>, BridgeError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ProviderCall::ListMetrics {
            region: self.region.clone(),
            namespace: namespace.to_string(),
        });
        Self::check_namespace(&state, "DescribeBaseMetrics", namespace)?;
        Ok(state
            .metrics
            .iter()
            .filter(|metric| metric.namespace == namespace)
            .cloned()
            .collect())
    }

    async fn fetch_monitor_data(
        &self,
        request: &GetMonitorDataRequest,
    ) -> Result<GetMonitorDataResponse, BridgeError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ProviderCall::FetchMonitorData {
            region: self.region.clone(),
            request: request.clone(),
        });
        Self::check_namespace(&state, "GetMonitorData", &request.namespace)?;
        Ok(state
            .monitor_data
            .get(&request.metric_name)
            .cloned()
            .unwrap_or_else(|| GetMonitorDataResponse {
                metric_name: request.metric_name.clone(),
                ..Default::default()
            }))
    }
}
