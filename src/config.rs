//! Configuration loading and validation.

use std::net::SocketAddr;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// One DNSBL zone: a display name and the domain suffix appended to the
/// reversed source address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Zone {
    pub name: String,
    pub suffix: String,
}

impl Zone {
    pub fn new(name: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            suffix: suffix.into(),
        }
    }
}

/// Main configuration for the autoblock filter.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Number of packet workers. Each worker owns one kernel queue, so this
    /// must match the queue fan-out configured in the kernel (queue numbers
    /// `0..num_workers`).
    #[serde(default = "default_num_workers")]
    pub num_workers: u16,

    /// TTL in seconds for both positive and negative verdicts. DNSBL
    /// listings churn on roughly this scale, and keeping negative entries
    /// bounds resolver traffic and memory.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,

    /// Interval in seconds between sweeps of expired cache entries.
    #[serde(default = "default_cache_sweep")]
    pub cache_sweep_seconds: u64,

    /// Capacity of the bounded lookup queue between packet workers and the
    /// lookup worker. Overflowing enqueues are dropped.
    #[serde(default = "default_lookup_queue_capacity")]
    pub lookup_queue_capacity: usize,

    /// Ordered list of DNSBL zones; the first zone that answers wins.
    #[serde(default = "default_zones")]
    pub zones: Vec<Zone>,

    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Metrics exporter configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,

    /// Address the counter snapshot is served on.
    #[serde(default = "default_metrics_listen")]
    pub listen: SocketAddr,
}

const fn default_num_workers() -> u16 {
    4
}

const fn default_cache_ttl() -> u64 {
    300
}

const fn default_cache_sweep() -> u64 {
    30
}

const fn default_lookup_queue_capacity() -> usize {
    1000
}

fn default_zones() -> Vec<Zone> {
    vec![
        Zone::new("blocklist.de", ".all.bl.blocklist.de"),
        Zone::new("cymru bogons", ".v4.fullbogons.cymru.com"),
    ]
}

const fn default_metrics_enabled() -> bool {
    true
}

fn default_metrics_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            listen: default_metrics_listen(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_workers: default_num_workers(),
            cache_ttl_seconds: default_cache_ttl(),
            cache_sweep_seconds: default_cache_sweep(),
            lookup_queue_capacity: default_lookup_queue_capacity(),
            zones: default_zones(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse(&content)
    }

    /// Load configuration from `path` when the file exists, otherwise fall
    /// back to the built-in defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.num_workers == 0 {
            return Err(ConfigError::Validation("num_workers must be > 0".into()).into());
        }

        if self.cache_ttl_seconds == 0 {
            return Err(ConfigError::Validation("cache_ttl_seconds must be > 0".into()).into());
        }

        if self.cache_sweep_seconds == 0 {
            return Err(ConfigError::Validation("cache_sweep_seconds must be > 0".into()).into());
        }

        if self.lookup_queue_capacity == 0 {
            return Err(
                ConfigError::Validation("lookup_queue_capacity must be > 0".into()).into(),
            );
        }

        for zone in &self.zones {
            if zone.name.is_empty() {
                return Err(ConfigError::Validation("empty zone name".into()).into());
            }
            if !zone.suffix.starts_with('.') || zone.suffix.len() <= 1 {
                return Err(ConfigError::Validation(format!(
                    "invalid zone suffix: {:?}",
                    zone.suffix
                ))
                .into());
            }
        }

        Ok(())
    }
}
