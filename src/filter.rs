//! Filter Builder: turns optional request parameters into a query predicate.
//!
//! Filter values never end up in SQL text. [`Filter::predicate`] emits `?`
//! placeholders and hands the values back separately for binding.

use std::collections::HashMap;

use crate::reading::SensorType;
use crate::validation::ValidationError;

/// Conjunction of optional constraints applied to a read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub device_uuid: Option<String>,
    pub sensor_type: Option<SensorType>,
    pub start: Option<i64>,
    pub end: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("{0} must be an integer epoch timestamp")]
    InvalidTimestamp(&'static str),

    #[error(transparent)]
    InvalidSensorType(#[from] ValidationError),
}

/// A value bound to one `?` placeholder of a [`Predicate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterParam {
    Text(String),
    Integer(i64),
}

/// SQL `WHERE` fragment plus the parameters it expects, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<&'static str>,
    params: Vec<FilterParam>,
}

impl Predicate {
    fn push(&mut self, clause: &'static str, param: FilterParam) {
        self.clauses.push(clause);
        self.params.push(param);
    }

    /// `WHERE a AND b ...`, or an empty string when unconstrained.
    pub fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub fn params(&self) -> &[FilterParam] {
        &self.params
    }
}

/// Extracts `start`, `end` and `type` from request parameters.
///
/// Each key is optional and an empty value counts as absent. The device is not
/// read from here; it comes from the path, see [`Filter::for_device`].
pub fn build_filter(params: &HashMap<String, String>) -> Result<Filter, FilterError> {
    let start = parse_timestamp(params, "start")?;
    let end = parse_timestamp(params, "end")?;
    let sensor_type = non_empty(params, "type")
        .map(|raw| raw.parse::<SensorType>().map_err(|_| ValidationError::InvalidSensorType))
        .transpose()?;

    Ok(Filter {
        device_uuid: None,
        sensor_type,
        start,
        end,
    })
}

fn non_empty<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn parse_timestamp(
    params: &HashMap<String, String>,
    key: &'static str,
) -> Result<Option<i64>, FilterError> {
    non_empty(params, key)
        .map(|raw| raw.parse().map_err(|_| FilterError::InvalidTimestamp(key)))
        .transpose()
}

impl Filter {
    /// Adds the implicit device equality constraint taken from the path.
    pub fn for_device(mut self, device_uuid: impl Into<String>) -> Self {
        self.device_uuid = Some(device_uuid.into());
        self
    }

    /// Both time bounds are inclusive.
    pub fn predicate(&self) -> Predicate {
        let mut predicate = Predicate::default();

        if let Some(device_uuid) = &self.device_uuid {
            predicate.push("device_uuid = ?", FilterParam::Text(device_uuid.clone()));
        }
        if let Some(start) = self.start {
            predicate.push("date_created >= ?", FilterParam::Integer(start));
        }
        if let Some(end) = self.end {
            predicate.push("date_created <= ?", FilterParam::Integer(end));
        }
        if let Some(sensor_type) = self.sensor_type {
            predicate.push(
                "type = ?",
                FilterParam::Text(sensor_type.as_str().to_string()),
            );
        }

        predicate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_params_impose_no_constraint() {
        let filter = build_filter(&HashMap::new()).unwrap();
        assert_eq!(filter, Filter::default());
        assert_eq!(filter.predicate().where_clause(), "");
        assert!(filter.predicate().params().is_empty());
    }

    #[test]
    fn test_all_params_are_anded_in_order() {
        let filter = build_filter(&params(&[
            ("start", "100"),
            ("end", "200"),
            ("type", "Humidity"),
        ]))
        .unwrap()
        .for_device("dev-1");

        let predicate = filter.predicate();
        assert_eq!(
            predicate.where_clause(),
            "WHERE device_uuid = ? AND date_created >= ? AND date_created <= ? AND type = ?"
        );
        assert_eq!(
            predicate.params(),
            &[
                FilterParam::Text("dev-1".to_string()),
                FilterParam::Integer(100),
                FilterParam::Integer(200),
                FilterParam::Text("humidity".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let filter = build_filter(&params(&[("start", ""), ("type", "")])).unwrap();
        assert_eq!(filter, Filter::default());
    }

    #[test]
    fn test_zero_start_is_applied() {
        let filter = build_filter(&params(&[("start", "0")])).unwrap();
        assert_eq!(filter.start, Some(0));
    }

    #[test]
    fn test_malformed_timestamp_is_rejected() {
        let err = build_filter(&params(&[("end", "1 OR 1=1")])).unwrap_err();
        assert_eq!(err, FilterError::InvalidTimestamp("end"));
        assert_eq!(err.to_string(), "end must be an integer epoch timestamp");
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = build_filter(&params(&[("type", "\" OR \"\"=\"")])).unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidSensorType(ValidationError::InvalidSensorType)
        );
    }

    #[test]
    fn test_device_value_is_bound_not_interpolated() {
        let filter = Filter::default().for_device("x\" OR 1=1 --");
        let predicate = filter.predicate();

        assert!(!predicate.where_clause().contains("OR 1=1"));
        assert_eq!(
            predicate.params(),
            &[FilterParam::Text("x\" OR 1=1 --".to_string())]
        );
    }
}
