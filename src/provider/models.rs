//! Request and response shapes of the Tencent Cloud APIs used by the bridge.
//!
//! Field names follow the provider's PascalCase JSON.

use crate::datamodel::query::Dimension;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct RegionInfo {
    pub region: String,
    pub region_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct MetricMeaning {
    #[serde(default)]
    pub en: Option<String>,
    #[serde(default)]
    pub zh: Option<String>,
}

/// A group of dimension names that together identify a monitored object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct DimensionsDesc {
    #[serde(default)]
    pub dimensions: Vec<String>,
}

/// Metric descriptor returned by `DescribeBaseMetrics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct MetricSet {
    pub namespace: String,
    pub metric_name: String,
    #[serde(default, rename = "MetricCName")]
    pub metric_c_name: Option<String>,
    #[serde(default, rename = "MetricEName")]
    pub metric_e_name: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub unit_cname: Option<String>,
    /// Supported sampling periods, in seconds
    #[serde(default)]
    pub period: Vec<u64>,
    #[serde(default)]
    pub meaning: Option<MetricMeaning>,
    #[serde(default)]
    pub dimensions: Vec<DimensionsDesc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProviderDimension {
    pub name: String,
    pub value: String,
}

impl From<&Dimension> for ProviderDimension {
    fn from(dimension: &Dimension) -> Self {
        Self {
            name: dimension.name.clone(),
            value: dimension.value.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Instance {
    pub dimensions: Vec<ProviderDimension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetMonitorDataRequest {
    pub namespace: String,
    pub metric_name: String,
    pub period: u64,
    pub start_time: String,
    pub end_time: String,
    pub instances: Vec<Instance>,
}

/// One series: its labels and parallel timestamp/value arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataPoint {
    #[serde(default)]
    pub dimensions: Vec<ProviderDimension>,
    /// Unix seconds
    #[serde(default)]
    pub timestamps: Vec<f64>,
    #[serde(default)]
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetMonitorDataResponse {
    #[serde(default)]
    pub period: Option<u64>,
    #[serde(default)]
    pub metric_name: String,
    #[serde(default)]
    pub data_points: Vec<DataPoint>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeRegionsResponse {
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub region_set: Vec<RegionInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeBaseMetricsResponse {
    #[serde(default)]
    pub metric_set: Vec<MetricSet>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeBaseMetricsRequest<'a> {
    pub namespace: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiError {
    pub code: String,
    pub message: String,
}
