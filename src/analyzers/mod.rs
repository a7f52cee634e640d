//! Per-request aggregation of reading values.
//!
//! This module reduces the rows a filtered read returns into the response
//! shapes served over HTTP: single values, quartile pairs, and per-device
//! summaries.

pub mod aggregate;
pub mod types;
