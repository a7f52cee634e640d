//! Domain model for stored sensor readings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kinds of sensor a device can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorType {
    Temperature,
    Humidity,
}

impl SensorType {
    /// Canonical lowercase name, as stored in the `type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorType::Temperature => "temperature",
            SensorType::Humidity => "humidity",
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive parse. Anything other than the two known names fails.
impl FromStr for SensorType {
    type Err = UnknownSensorType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "temperature" => Ok(SensorType::Temperature),
            "humidity" => Ok(SensorType::Humidity),
            _ => Err(UnknownSensorType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sensor type: {0}")]
pub struct UnknownSensorType(pub String);

/// One timestamped sensor value for a device. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub device_uuid: String,
    #[serde(rename = "type")]
    pub sensor_type: SensorType,
    pub value: i64,
    pub date_created: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Temperature".parse(), Ok(SensorType::Temperature));
        assert_eq!("HUMIDITY".parse(), Ok(SensorType::Humidity));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("flavor".parse::<SensorType>().is_err());
        assert!("".parse::<SensorType>().is_err());
    }

    #[test]
    fn test_reading_serializes_with_type_key() {
        let reading = Reading {
            device_uuid: "dev-1".to_string(),
            sensor_type: SensorType::Humidity,
            value: 73,
            date_created: 1_700_000_000,
        };

        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["type"], "humidity");
        assert_eq!(json["device_uuid"], "dev-1");
        assert_eq!(json["value"], 73);
        assert_eq!(json["date_created"], 1_700_000_000);
    }
}
