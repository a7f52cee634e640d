//! Response types produced by the aggregation layer.

use serde::Serialize;

/// A single reduced value, `null` when nothing matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValueResponse {
    pub value: Option<i64>,
}

/// First and third quartile. Both are `null` with fewer than two readings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Quartiles {
    pub quartile_1: Option<i64>,
    pub quartile_3: Option<i64>,
}

/// Statistics for one device over the filtered readings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceSummary {
    pub device_uuid: String,
    pub number_of_readings: usize,
    pub max_reading_value: i64,
    pub median_reading_value: i64,
    pub mean_reading_value: i64,
    pub quartile_1_value: Option<i64>,
    pub quartile_3_value: Option<i64>,
}
