//! Reshapes provider monitor data into frames.
//!
//! [`transform_monitor_data`] keeps the historical single-frame layout: the
//! labels of the first series, the timestamps of every series, and the values
//! of the last series only. With more than one series the two columns end up
//! with different lengths. Callers that need one consistent table per series
//! opt into [`transform_monitor_data_per_series`].

use super::bridge_datetime::{BridgeDateTime, BridgeDateTimeExt};
use super::frame::{Field, FieldValues, Frame, FrameLabels};
use crate::provider::models::{DataPoint, GetMonitorDataResponse};

pub const TIME_FIELD_NAME: &str = "Timestamps";

fn series_labels(series: &DataPoint) -> FrameLabels {
    series
        .dimensions
        .iter()
        .map(|dimension| (dimension.name.clone(), dimension.value.clone()))
        .collect()
}

fn to_datetime(timestamp: f64) -> BridgeDateTime {
    BridgeDateTime::from_unix_seconds_i64(timestamp.trunc() as i64)
}

fn build_frame(
    metric_name: &str,
    labels: FrameLabels,
    times: Vec<BridgeDateTime>,
    values: Vec<Option<f64>>,
) -> Frame {
    Frame::new("")
        .with_field(Field::new(
            TIME_FIELD_NAME,
            labels.clone(),
            FieldValues::Time(times),
        ))
        .with_field(Field::new(
            metric_name,
            labels,
            FieldValues::NullableFloat(values),
        ))
}

/// Converts a monitor data response into exactly one frame.
pub fn transform_monitor_data(response: &GetMonitorDataResponse) -> Frame {
    let labels = response
        .data_points
        .first()
        .map(series_labels)
        .unwrap_or_default();

    let times = response
        .data_points
        .iter()
        .flat_map(|series| series.timestamps.iter().copied().map(to_datetime))
        .collect();

    let values = response
        .data_points
        .last()
        .map(|series| series.values.clone())
        .unwrap_or_default();

    build_frame(&response.metric_name, labels, times, values)
}

/// Converts a monitor data response into one frame per series, each carrying
/// its own labels, timestamps and values.
pub fn transform_monitor_data_per_series(response: &GetMonitorDataResponse) -> Vec<Frame> {
    if response.data_points.is_empty() {
        return vec![transform_monitor_data(response)];
    }

    response
        .data_points
        .iter()
        .map(|series| {
            build_frame(
                &response.metric_name,
                series_labels(series),
                series.timestamps.iter().copied().map(to_datetime).collect(),
                series.values.clone(),
            )
        })
        .collect()
}
