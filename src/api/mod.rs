//! HTTP surface of the service.
//!
//! Thin axum glue: each route builds a [`Filter`](crate::filter::Filter) from
//! the request, asks the [`ReadingStore`] for rows or an aggregate, and
//! serializes the reduced result as JSON.

mod error;
mod handlers;

pub use error::ApiError;

use anyhow::Result;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServiceConfig;
use crate::store::ReadingStore;

/// Shared handler state. The store is the only thing requests share.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReadingStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ReadingStore>) -> Self {
        Self { store }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/devices/summaries/", get(handlers::device_summaries))
        .route(
            "/devices/:device_uuid/readings/",
            get(handlers::list_readings).post(handlers::create_reading),
        )
        .route("/devices/:device_uuid/readings/min/", get(handlers::min_reading))
        .route("/devices/:device_uuid/readings/max/", get(handlers::max_reading))
        .route("/devices/:device_uuid/readings/mean/", get(handlers::mean_reading))
        .route(
            "/devices/:device_uuid/readings/median/",
            get(handlers::median_reading),
        )
        .route("/devices/:device_uuid/readings/mode/", get(handlers::mode_reading))
        .route(
            "/devices/:device_uuid/readings/quartiles/",
            get(handlers::quartile_readings),
        )
        .with_state(state)
}

/// [`router`] wrapped in the request timeout and HTTP tracing layers.
///
/// Requests running past `config.request_timeout` get 408 Request Timeout.
pub fn app(config: &ServiceConfig, state: AppState) -> Router {
    router(state)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}

/// Binds `config.bind_addr` and serves until Ctrl+C.
pub async fn serve(config: &ServiceConfig, store: Arc<dyn ReadingStore>) -> Result<()> {
    let service = app(config, AppState::new(store));

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(
        addr = %config.bind_addr,
        timeout_secs = config.request_timeout.as_secs(),
        "Listening for HTTP requests"
    );

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
