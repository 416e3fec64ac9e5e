//! Flat time-series tables consumed by the visualization host.
//!
//! A [`Frame`] is serialized in the host's data frame JSON layout: a schema
//! listing the fields, and the column values side by side.

use super::bridge_datetime::{BridgeDateTime, BridgeDateTimeExt};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

pub type FrameLabels = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValues {
    Time(Vec<BridgeDateTime>),
    NullableFloat(Vec<Option<f64>>),
}

impl FieldValues {
    pub fn len(&self) -> usize {
        match self {
            FieldValues::Time(values) => values.len(),
            FieldValues::NullableFloat(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn type_name(&self) -> &'static str {
        match self {
            FieldValues::Time(_) => "time",
            FieldValues::NullableFloat(_) => "number",
        }
    }

    fn to_json(&self) -> Value {
        match self {
            FieldValues::Time(values) => Value::Array(
                values
                    .iter()
                    .map(|datetime| Value::from(datetime.to_unix_milliseconds_i64()))
                    .collect(),
            ),
            // serde_json maps non-finite floats to null as well
            FieldValues::NullableFloat(values) => Value::Array(
                values
                    .iter()
                    .map(|value| value.map(Value::from).unwrap_or(Value::Null))
                    .collect(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub labels: FrameLabels,
    pub values: FieldValues,
}

impl Field {
    pub fn new(name: impl Into<String>, labels: FrameLabels, values: FieldValues) -> Self {
        Self {
            name: name.into(),
            labels,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn time_values(&self) -> Option<&[BridgeDateTime]> {
        match &self.values {
            FieldValues::Time(values) => Some(values),
            _ => None,
        }
    }

    pub fn float_values(&self) -> Option<&[Option<f64>]> {
        match &self.values {
            FieldValues::NullableFloat(values) => Some(values),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Frame {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Number of rows, taken from the longest field.
    pub fn rows(&self) -> usize {
        self.fields.iter().map(Field::len).max().unwrap_or(0)
    }
}

#[derive(Serialize)]
struct FrameJson<'a> {
    schema: SchemaJson<'a>,
    data: DataJson,
}

#[derive(Serialize)]
struct SchemaJson<'a> {
    name: &'a str,
    fields: Vec<FieldSchemaJson<'a>>,
}

#[derive(Serialize)]
struct FieldSchemaJson<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    field_type: &'static str,
    #[serde(skip_serializing_if = "has_no_labels")]
    labels: &'a FrameLabels,
}

fn has_no_labels(labels: &&FrameLabels) -> bool {
    labels.is_empty()
}

#[derive(Serialize)]
struct DataJson {
    values: Vec<Value>,
}

impl Serialize for Frame {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        FrameJson {
            schema: SchemaJson {
                name: &self.name,
                fields: self
                    .fields
                    .iter()
                    .map(|field| FieldSchemaJson {
                        name: &field.name,
                        field_type: field.values.type_name(),
                        labels: &field.labels,
                    })
                    .collect(),
            },
            data: DataJson {
                values: self.fields.iter().map(|field| field.values.to_json()).collect(),
            },
        }
        .serialize(serializer)
    }
}
