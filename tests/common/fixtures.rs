/// Test data fixtures for consistent testing
use serde_json::{Value, json};
use tcmonitor_bridge::provider::models::{
    DataPoint, GetMonitorDataResponse, MetricSet, ProviderDimension, RegionInfo,
};

/// 2024-01-01T00:00:00Z
pub const RANGE_FROM_MS: i64 = 1_704_067_200_000;
/// 2024-01-01T01:00:00Z
pub const RANGE_TO_MS: i64 = 1_704_070_800_000;

fn series(instance_id: &str, values: Vec<Option<f64>>) -> DataPoint {
    DataPoint {
        dimensions: vec![ProviderDimension {
            name: "InstanceId".to_string(),
            value: instance_id.to_string(),
        }],
        timestamps: vec![1704067200.0, 1704067260.0, 1704067320.0],
        values,
    }
}

/// Two CVM instances, three points each
pub fn two_series_cpu_usage() -> GetMonitorDataResponse {
    GetMonitorDataResponse {
        period: Some(60),
        metric_name: "CPUUsage".to_string(),
        data_points: vec![
            series("ins-1", vec![Some(1.0), Some(2.0), Some(3.0)]),
            series("ins-2", vec![Some(10.0), None, Some(30.0)]),
        ],
        request_id: Some("req-cpu".to_string()),
        ..Default::default()
    }
}

pub fn regions() -> Vec<RegionInfo> {
    vec![
        RegionInfo {
            region: "ap-guangzhou".to_string(),
            region_name: "华南地区(广州)".to_string(),
            region_state: Some("AVAILABLE".to_string()),
        },
        RegionInfo {
            region: "ap-shanghai".to_string(),
            region_name: "华东地区(上海)".to_string(),
            region_state: Some("AVAILABLE".to_string()),
        },
    ]
}

pub fn cvm_metrics() -> Vec<MetricSet> {
    vec![MetricSet {
        namespace: "QCE/CVM".to_string(),
        metric_name: "CPUUsage".to_string(),
        metric_c_name: Some("CPU利用率".to_string()),
        unit: Some("%".to_string()),
        period: vec![60, 300],
        ..Default::default()
    }]
}

/// Body of a `POST /query` call
pub fn query_request(queries: Vec<Value>) -> String {
    json!({
        "range": {"from": RANGE_FROM_MS.to_string(), "to": RANGE_TO_MS.to_string()},
        "queries": queries,
    })
    .to_string()
}

pub fn cpu_query(ref_id: &str) -> Value {
    json!({
        "refId": ref_id,
        "service": "QCE/CVM",
        "region": "ap-guangzhou",
        "metric": "CPUUsage",
        "period": 60,
        "dimensions": [
            {"name": "InstanceId", "value": "ins-1"},
            {"name": "InstanceId", "value": "ins-2"}
        ]
    })
}

/// Raw `GetMonitorData` answer as sent by the provider
pub fn monitor_data_body() -> Value {
    json!({
        "Response": {
            "StartTime": "2024-01-01 00:00:00",
            "EndTime": "2024-01-01 00:02:00",
            "Period": 60,
            "MetricName": "CPUUsage",
            "DataPoints": [{
                "Dimensions": [{"Name": "InstanceId", "Value": "ins-1"}],
                "Timestamps": [1704067200, 1704067260, 1704067320],
                "Values": [1.5, null, 2.5]
            }],
            "RequestId": "req-monitor"
        }
    })
}

pub fn regions_body() -> Value {
    json!({
        "Response": {
            "TotalCount": 1,
            "RegionSet": [
                {"Region": "ap-guangzhou", "RegionName": "华南地区(广州)", "RegionState": "AVAILABLE"}
            ],
            "RequestId": "req-regions"
        }
    })
}

pub fn api_error_body(code: &str, message: &str) -> Value {
    json!({
        "Response": {
            "Error": {"Code": code, "Message": message},
            "RequestId": "req-error"
        }
    })
}
