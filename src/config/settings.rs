use std::time::Duration;

use serde::Deserialize;

use crate::utils::constants::*;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// ================================
/// Token renewal heuristic
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    /// upstream never reports a TTL, this is an assumption
    #[serde(default = "default_validity_window")]
    pub validity_window_seconds: u64,
    /// invariant: < validity_window_seconds
    #[serde(default = "default_safety_margin")]
    pub safety_margin_seconds: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            validity_window_seconds: default_validity_window(),
            safety_margin_seconds: default_safety_margin(),
        }
    }
}

/// ================================
/// Per-attempt HTTP timeouts, in seconds
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct TimeoutsConfig {
    #[serde(default = "default_connect_timeout")]
    pub connect_seconds: f64,
    #[serde(default = "default_read_timeout")]
    pub read_seconds: f64,
    #[serde(default = "default_write_timeout")]
    pub write_seconds: f64,
    #[serde(default = "default_pool_timeout")]
    pub pool_seconds: f64,
}

impl TimeoutsConfig {
    pub fn connect(&self) -> Duration {
        seconds(self.connect_seconds)
    }

    pub fn read(&self) -> Duration {
        seconds(self.read_seconds)
    }

    /// Upper bound for one attempt; reqwest has no dedicated write or
    /// pool-acquisition timeout so both are folded in here.
    pub fn per_attempt(&self) -> Duration {
        seconds(self.connect_seconds + self.write_seconds + self.read_seconds + self.pool_seconds)
    }
}

/// Values out of `Duration` range saturate; the validator rejects them first.
fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::MAX)
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            connect_seconds: default_connect_timeout(),
            read_seconds: default_read_timeout(),
            write_seconds: default_write_timeout(),
            pool_seconds: default_pool_timeout(),
        }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new (level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("info".to_owned(), LogFormat::Compact)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> String {
    DEFAULT_PORT.to_string()
}

fn default_validity_window() -> u64 {
    DEFAULT_TOKEN_VALIDITY_WINDOW_SECS
}

fn default_safety_margin() -> u64 {
    DEFAULT_SAFETY_MARGIN_SECS
}

fn default_connect_timeout() -> f64 {
    10.0
}

fn default_read_timeout() -> f64 {
    60.0
}

fn default_write_timeout() -> f64 {
    30.0
}

fn default_pool_timeout() -> f64 {
    10.0
}
