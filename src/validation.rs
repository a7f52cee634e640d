//! Checks for inbound reading submissions.
//!
//! Each field is validated independently so that a single bad request
//! reports every problem at once.

use serde_json::Value;

use crate::reading::{Reading, SensorType};

pub const VALUE_MIN: i64 = 0;
pub const VALUE_MAX: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("The only allowed sensor types are 'temperature' and 'humidity'")]
    InvalidSensorType,

    #[error("The only allowed values are integers between 0 and 100 inclusive")]
    InvalidValue,

    #[error("date_created must be an integer epoch timestamp")]
    InvalidDateCreated,
}

/// All validation failures for one submission. Never empty.
///
/// Displays as the individual messages joined by newlines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_lines(.errors))]
pub struct SubmissionError {
    errors: Vec<ValidationError>,
}

impl SubmissionError {
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }
}

fn join_lines(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Accepts only a JSON string naming a known sensor type, in any case.
pub fn validate_sensor_type(input: &Value) -> Result<SensorType, ValidationError> {
    input
        .as_str()
        .and_then(|s| s.parse().ok())
        .ok_or(ValidationError::InvalidSensorType)
}

/// Accepts only a JSON integer in `[0, 100]`.
///
/// Floats (even `50.0`), numeric strings and booleans are rejected; there is
/// no implicit coercion.
pub fn validate_value(input: &Value) -> Result<i64, ValidationError> {
    match input {
        Value::Number(n) => n
            .as_i64()
            .filter(|v| (VALUE_MIN..=VALUE_MAX).contains(v))
            .ok_or(ValidationError::InvalidValue),
        _ => Err(ValidationError::InvalidValue),
    }
}

/// Missing or null falls back to `now`; anything else must be a JSON integer.
pub fn validate_date_created(input: Option<&Value>, now: i64) -> Result<i64, ValidationError> {
    match input {
        None | Some(Value::Null) => Ok(now),
        Some(Value::Number(n)) => n.as_i64().ok_or(ValidationError::InvalidDateCreated),
        Some(_) => Err(ValidationError::InvalidDateCreated),
    }
}

/// Builds a [`Reading`] from a submitted JSON body, running every validator.
///
/// The reading is only returned when all fields pass; otherwise every failing
/// message is collected into the [`SubmissionError`].
pub fn validate_submission(
    device_uuid: &str,
    body: &Value,
    now: i64,
) -> Result<Reading, SubmissionError> {
    let sensor_type = validate_sensor_type(body.get("type").unwrap_or(&Value::Null));
    let value = validate_value(body.get("value").unwrap_or(&Value::Null));
    let date_created = validate_date_created(body.get("date_created"), now);

    match (sensor_type, value, date_created) {
        (Ok(sensor_type), Ok(value), Ok(date_created)) => Ok(Reading {
            device_uuid: device_uuid.to_string(),
            sensor_type,
            value,
            date_created,
        }),
        (sensor_type, value, date_created) => {
            let errors = [sensor_type.err(), value.err(), date_created.err()]
                .into_iter()
                .flatten()
                .collect();
            Err(SubmissionError { errors })
        }
    }
}
