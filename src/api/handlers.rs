use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, info};

use super::{ApiError, AppState};
use crate::analyzers::aggregate::{self, summarize_by_device};
use crate::analyzers::types::{DeviceSummary, Quartiles, ValueResponse};
use crate::filter::build_filter;
use crate::reading::Reading;
use crate::stats;
use crate::store::AggregateOp;
use crate::validation::validate_submission;

type QueryParams = Query<HashMap<String, String>>;

/// POST /devices/{id}/readings/
///
/// The body is parsed as JSON whatever the Content-Type says.
#[tracing::instrument(skip(state, body))]
pub async fn create_reading(
    State(state): State<AppState>,
    Path(device_uuid): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, &'static str), ApiError> {
    let body: serde_json::Value =
        serde_json::from_slice(&body).map_err(|_| ApiError::MalformedBody)?;

    let reading = validate_submission(&device_uuid, &body, Utc::now().timestamp())?;
    state.store.insert(&reading).await?;

    info!(
        sensor_type = %reading.sensor_type,
        value = reading.value,
        "Reading stored"
    );
    Ok((StatusCode::CREATED, "success"))
}

/// GET /devices/{id}/readings/
#[tracing::instrument(skip(state))]
pub async fn list_readings(
    State(state): State<AppState>,
    Path(device_uuid): Path<String>,
    Query(params): QueryParams,
) -> Result<Json<Vec<Reading>>, ApiError> {
    let filter = build_filter(&params)?.for_device(device_uuid);
    let readings = state.store.select(&filter).await?;
    Ok(Json(readings))
}

/// GET /devices/{id}/readings/min/
pub async fn min_reading(
    State(state): State<AppState>,
    Path(device_uuid): Path<String>,
    Query(params): QueryParams,
) -> Result<Json<ValueResponse>, ApiError> {
    store_aggregate(&state, device_uuid, &params, AggregateOp::Min).await
}

/// GET /devices/{id}/readings/max/
pub async fn max_reading(
    State(state): State<AppState>,
    Path(device_uuid): Path<String>,
    Query(params): QueryParams,
) -> Result<Json<ValueResponse>, ApiError> {
    store_aggregate(&state, device_uuid, &params, AggregateOp::Max).await
}

/// GET /devices/{id}/readings/mean/
pub async fn mean_reading(
    State(state): State<AppState>,
    Path(device_uuid): Path<String>,
    Query(params): QueryParams,
) -> Result<Json<ValueResponse>, ApiError> {
    store_aggregate(&state, device_uuid, &params, AggregateOp::Avg).await
}

/// GET /devices/{id}/readings/median/
pub async fn median_reading(
    State(state): State<AppState>,
    Path(device_uuid): Path<String>,
    Query(params): QueryParams,
) -> Result<Json<ValueResponse>, ApiError> {
    let values = device_values(&state, device_uuid, &params).await?;
    Ok(Json(ValueResponse {
        value: stats::median(&values),
    }))
}

/// GET /devices/{id}/readings/mode/
pub async fn mode_reading(
    State(state): State<AppState>,
    Path(device_uuid): Path<String>,
    Query(params): QueryParams,
) -> Result<Json<ValueResponse>, ApiError> {
    let values = device_values(&state, device_uuid, &params).await?;
    Ok(Json(ValueResponse {
        value: stats::mode(&values),
    }))
}

/// GET /devices/{id}/readings/quartiles/
pub async fn quartile_readings(
    State(state): State<AppState>,
    Path(device_uuid): Path<String>,
    Query(params): QueryParams,
) -> Result<Json<Quartiles>, ApiError> {
    let values = device_values(&state, device_uuid, &params).await?;
    Ok(Json(aggregate::quartiles(&values)))
}

/// GET /devices/summaries/
#[tracing::instrument(skip(state))]
pub async fn device_summaries(
    State(state): State<AppState>,
    Query(params): QueryParams,
) -> Result<Json<Vec<DeviceSummary>>, ApiError> {
    let filter = build_filter(&params)?;
    let readings = state.store.select(&filter).await?;
    let summaries = summarize_by_device(&readings);

    debug!(
        readings = readings.len(),
        devices = summaries.len(),
        "Summaries computed"
    );
    Ok(Json(summaries))
}

#[tracing::instrument(skip(state, params))]
async fn store_aggregate(
    state: &AppState,
    device_uuid: String,
    params: &HashMap<String, String>,
    op: AggregateOp,
) -> Result<Json<ValueResponse>, ApiError> {
    let filter = build_filter(params)?.for_device(device_uuid);
    let value = state.store.select_aggregate(&filter, op).await?;
    Ok(Json(aggregate::truncated(value)))
}

async fn device_values(
    state: &AppState,
    device_uuid: String,
    params: &HashMap<String, String>,
) -> Result<Vec<i64>, ApiError> {
    let filter = build_filter(params)?.for_device(device_uuid);
    let readings = state.store.select(&filter).await?;
    Ok(aggregate::values_of(&readings))
}
