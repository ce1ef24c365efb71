//! Error types for the autoblock filter.

use std::io;
use std::net::IpAddr;

use thiserror::Error;

/// Main error type for autoblock operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to open kernel queue {index}: {source}")]
    QueueOpen {
        index: u16,
        #[source]
        source: io::Error,
    },

    #[error("address is not IPv4: {0}")]
    NotIpv4(IpAddr),

    #[error("resolver error: {0}")]
    Resolver(String),

    #[error("metrics exporter error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[source] io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("validation failed: {0}")]
    Validation(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;
