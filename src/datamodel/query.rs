use super::bridge_datetime::{BridgeDateTime, BridgeDateTimeExt};
use super::frame::Frame;
use crate::error::BridgeError;
use crate::settings::DataSourceInstanceSettings;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Name/value pair used as a query filter and as a label on output fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

impl Dimension {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Absolute time range, boundaries in Unix milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(deserialize_with = "deserialize_unix_milliseconds")]
    pub from: i64,
    #[serde(deserialize_with = "deserialize_unix_milliseconds")]
    pub to: i64,
}

impl TimeRange {
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }

    pub fn start(&self) -> BridgeDateTime {
        BridgeDateTime::from_unix_milliseconds_i64(self.from)
    }

    pub fn end(&self) -> BridgeDateTime {
        BridgeDateTime::from_unix_milliseconds_i64(self.to)
    }
}

// The host sends epoch milliseconds either as numbers or as numeric strings
fn deserialize_unix_milliseconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Millis {
        Number(i64),
        Text(String),
    }

    match Millis::deserialize(deserializer)? {
        Millis::Number(value) => Ok(value),
        Millis::Text(text) => text.trim().parse::<i64>().map_err(|_| {
            serde::de::Error::custom(format!("invalid epoch milliseconds: {:?}", text))
        }),
    }
}

// Absent and `null` fields both read as the zero value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One metric request, parsed from the query body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryModel {
    /// Provider namespace, e.g. `QCE/CVM`
    #[serde(default, deserialize_with = "null_as_default")]
    pub service: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metric: String,
    /// Sampling period in seconds
    #[serde(default, deserialize_with = "null_as_default")]
    pub period: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dimensions: Vec<Dimension>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hide: bool,
    /// Emit one frame per series instead of the single merged frame
    #[serde(default, deserialize_with = "null_as_default")]
    pub split_series: bool,
    /// Taken from the surrounding query, never from the body
    #[serde(skip)]
    pub time_range: Option<TimeRange>,
}

impl QueryModel {
    /// Parses the query body and attaches the query's time range, falling back
    /// to the request-wide range.
    pub fn from_data_query(
        query: &DataQuery,
        fallback_range: Option<TimeRange>,
    ) -> Result<Self, BridgeError> {
        let mut model: QueryModel = serde_json::from_value(Value::Object(query.json.clone()))
            .map_err(|e| BridgeError::validation(format!("error reading query: {}", e)))?;
        model.time_range = query.time_range.or(fallback_range);
        Ok(model)
    }

    pub fn start_time(&self) -> Option<String> {
        self.time_range.map(|range| range.start().to_rfc3339_utc())
    }

    pub fn end_time(&self) -> Option<String> {
        self.time_range.map(|range| range.end().to_rfc3339_utc())
    }
}

/// A query as sent by the host: an identifier, a time range, and the query
/// body fields flattened beside them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuery {
    #[serde(default)]
    pub ref_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
    #[serde(flatten)]
    pub json: Map<String, Value>,
}

impl DataQuery {
    /// Reads `hide` alone, so a hidden query never depends on the rest of its
    /// body being well-formed.
    pub fn is_hidden(&self) -> bool {
        self.json.get("hide").and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn new(ref_id: impl Into<String>, time_range: Option<TimeRange>, body: Value) -> Self {
        let json = match body {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            ref_id: ref_id.into(),
            time_range,
            json,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginContext {
    #[serde(default)]
    pub data_source_instance_settings: Option<DataSourceInstanceSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDataRequest {
    #[serde(default)]
    pub plugin_context: Option<PluginContext>,
    /// Used by queries that carry no time range of their own
    #[serde(default)]
    pub range: Option<TimeRange>,
    pub queries: Vec<DataQuery>,
}

/// Outcome of a single query: frames on success, an error otherwise.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DataResponse {
    pub frames: Vec<Frame>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub status: u16,
}

impl DataResponse {
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            error: None,
            status: 200,
        }
    }

    pub fn from_error(error: &BridgeError) -> Self {
        Self {
            frames: Vec::new(),
            error: Some(error.to_string()),
            status: error.status_code().as_u16(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryDataResponse {
    pub results: BTreeMap<String, DataResponse>,
}
