//! Service configuration.
//!
//! Built once at startup and handed explicitly to the store and the HTTP
//! server. Tests get an isolated database simply by pointing
//! `database_path` somewhere else.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATABASE_PATH: &str = "database.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub database_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub request_timeout: Duration,
}

impl ServiceConfig {
    pub fn new(database_path: impl Into<PathBuf>, bind_addr: SocketAddr) -> Self {
        Self {
            database_path: database_path.into(),
            bind_addr,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_DATABASE_PATH,
            SocketAddr::from(([127, 0, 0, 1], 5000)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_constants() {
        let config = ServiceConfig::default();

        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE_PATH));
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(
            config.request_timeout,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_with_request_timeout() {
        let config = ServiceConfig::default().with_request_timeout(Duration::from_secs(2));
        assert_eq!(config.request_timeout, Duration::from_secs(2));
    }
}
