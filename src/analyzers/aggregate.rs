use std::collections::BTreeMap;

use crate::analyzers::types::{DeviceSummary, Quartiles, ValueResponse};
use crate::reading::Reading;
use crate::stats;

/// Truncates a store-computed aggregate (e.g. SQL `AVG`) toward zero.
pub fn truncated(value: Option<f64>) -> ValueResponse {
    ValueResponse {
        value: value.map(|v| v.trunc() as i64),
    }
}

pub fn values_of(readings: &[Reading]) -> Vec<i64> {
    readings.iter().map(|r| r.value).collect()
}

pub fn quartiles(values: &[i64]) -> Quartiles {
    match stats::quartiles(values) {
        Some((q1, q3)) => Quartiles {
            quartile_1: Some(q1),
            quartile_3: Some(q3),
        },
        None => Quartiles::default(),
    }
}

/// Groups `readings` by device and summarizes each group.
///
/// Output is sorted by `device_uuid` ascending regardless of input order.
/// Devices with no readings do not appear.
pub fn summarize_by_device(readings: &[Reading]) -> Vec<DeviceSummary> {
    let mut groups: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
    for reading in readings {
        groups
            .entry(reading.device_uuid.as_str())
            .or_default()
            .push(reading.value);
    }

    groups
        .into_iter()
        .filter_map(|(device_uuid, values)| summarize(device_uuid, &values))
        .collect()
}

fn summarize(device_uuid: &str, values: &[i64]) -> Option<DeviceSummary> {
    let quartiles = quartiles(values);

    Some(DeviceSummary {
        device_uuid: device_uuid.to_string(),
        number_of_readings: values.len(),
        max_reading_value: stats::max(values)?,
        median_reading_value: stats::median(values)?,
        mean_reading_value: stats::mean(values)?,
        quartile_1_value: quartiles.quartile_1,
        quartile_3_value: quartiles.quartile_3,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::SensorType;

    #[test]
    fn test_summary_for_three_readings() {
        let readings = create_readings("test_device", &[22, 50, 100]);

        let summaries = summarize_by_device(&readings);

        assert_eq!(
            summaries,
            vec![DeviceSummary {
                device_uuid: "test_device".to_string(),
                number_of_readings: 3,
                max_reading_value: 100,
                median_reading_value: 50,
                mean_reading_value: 57,
                quartile_1_value: Some(22),
                quartile_3_value: Some(100),
            }]
        );
    }

    #[test]
    fn test_single_reading_has_no_quartiles() {
        let summaries = summarize_by_device(&create_readings("d", &[73]));

        assert_eq!(summaries[0].number_of_readings, 1);
        assert_eq!(summaries[0].median_reading_value, 73);
        assert_eq!(summaries[0].quartile_1_value, None);
        assert_eq!(summaries[0].quartile_3_value, None);
    }

    #[test]
    fn test_output_is_sorted_by_device() {
        let mut readings = create_readings("zeta", &[1, 2]);
        readings.extend(create_readings("alpha", &[22, 30]));
        readings.extend(create_readings("zeta", &[3]));

        let summaries = summarize_by_device(&readings);
        let devices: Vec<&str> = summaries.iter().map(|s| s.device_uuid.as_str()).collect();

        assert_eq!(devices, vec!["alpha", "zeta"]);
        assert_eq!(summaries[0].quartile_1_value, Some(20));
        assert_eq!(summaries[0].quartile_3_value, Some(32));
        assert_eq!(summaries[1].number_of_readings, 3);
    }

    #[test]
    fn test_empty_input_yields_no_summaries() {
        assert!(summarize_by_device(&[]).is_empty());
    }

    #[test]
    fn test_truncated() {
        assert_eq!(truncated(Some(61.25)).value, Some(61));
        assert_eq!(truncated(Some(0.0)).value, Some(0));
        assert_eq!(truncated(None).value, None);
    }

    #[test]
    fn test_response_field_names() {
        assert_eq!(
            serde_json::to_value(truncated(None)).unwrap(),
            serde_json::json!({"value": null})
        );
        assert_eq!(
            serde_json::to_value(quartiles(&[22, 30])).unwrap(),
            serde_json::json!({"quartile_1": 20, "quartile_3": 32})
        );
    }

    // Helper functions for tests
    fn create_readings(device: &str, values: &[i64]) -> Vec<Reading> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| Reading {
                device_uuid: device.to_string(),
                sensor_type: SensorType::Temperature,
                value,
                date_created: i as i64,
            })
            .collect()
    }
}
