//! CLI entry point for the sensor readings service.
//!
//! Provides subcommands for serving the HTTP API, printing per-device
//! summaries, and exporting readings to CSV.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use sensor_readings::{
    analyzers::aggregate::summarize_by_device,
    api,
    config::{DEFAULT_BIND_ADDR, DEFAULT_DATABASE_PATH, DEFAULT_REQUEST_TIMEOUT_SECS, ServiceConfig},
    filter::{Filter, build_filter},
    output::{append_readings, write_json},
    store::{ReadingStore, SqliteReadingStore},
};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "sensor_readings")]
#[command(about = "Store and summarize IoT sensor readings", long_about = None)]
struct Cli {
    /// SQLite database file holding the readings table
    #[arg(long, global = true, env = "SENSOR_DB_PATH", default_value = DEFAULT_DATABASE_PATH)]
    database: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, env = "SENSOR_BIND_ADDR", default_value = DEFAULT_BIND_ADDR)]
        bind: SocketAddr,

        /// Per-request timeout in seconds
        #[arg(long, env = "SENSOR_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
        timeout_secs: u64,
    },
    /// Print per-device summaries as JSON
    Summarize {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Append matching readings to a CSV file
    Export {
        /// CSV file to append results to
        #[arg(short, long, default_value = "readings.csv")]
        output: String,

        /// Only export readings from this device
        #[arg(long)]
        device: Option<String>,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

/// Same optional constraints the HTTP query string accepts.
#[derive(Args)]
struct FilterArgs {
    /// Sensor type (temperature or humidity)
    #[arg(long = "type")]
    sensor_type: Option<String>,

    /// Inclusive lower bound on date_created (epoch seconds)
    #[arg(long)]
    start: Option<String>,

    /// Inclusive upper bound on date_created (epoch seconds)
    #[arg(long)]
    end: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> Result<Filter> {
        let mut params = HashMap::new();
        for (key, value) in [
            ("type", &self.sensor_type),
            ("start", &self.start),
            ("end", &self.end),
        ] {
            if let Some(value) = value {
                params.insert(key.to_string(), value.clone());
            }
        }
        Ok(build_filter(&params)?)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Held until exit so buffered file logs are flushed.
    let _file_guard = init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind, timeout_secs } => {
            let config = ServiceConfig::new(cli.database, bind)
                .with_request_timeout(Duration::from_secs(timeout_secs));
            let store = SqliteReadingStore::open(&config.database_path)?;

            info!(
                database = %config.database_path.display(),
                "Starting sensor readings service"
            );
            api::serve(&config, Arc::new(store)).await?;
        }
        Commands::Summarize { filter } => {
            let store = SqliteReadingStore::open(&cli.database)?;
            let readings = store.select(&filter.to_filter()?).await?;
            let summaries = summarize_by_device(&readings);

            info!(devices = summaries.len(), "Summaries computed");
            write_json(std::io::stdout().lock(), &summaries)?;
        }
        Commands::Export {
            output,
            device,
            filter,
        } => {
            let store = SqliteReadingStore::open(&cli.database)?;
            let mut filter = filter.to_filter()?;
            filter.device_uuid = device;

            let readings = store.select(&filter).await?;
            let written = append_readings(&output, &readings)?;
            info!(rows = written, output = %output, "Readings exported");
        }
    }

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/sensor_readings.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("sensor_readings.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "info"));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", "debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    file_guard
}

fn env_filter(var: &str, default: &str) -> EnvFilter {
    EnvFilter::try_from_env(var).unwrap_or_else(|_| EnvFilter::new(default))
}
