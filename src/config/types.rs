use serde::Deserialize;

use crate::config::settings::{LoggingConfig, ServerConfig, TimeoutsConfig, TokenConfig};
use crate::config::upstream::{PaymentMeansConfig, UpstreamConfig};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub logging: Option<LoggingConfig>,
    /// empty or absent leaves the gateway open
    #[serde(default)]
    pub api_key: Option<String>,
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub token: TokenConfig,
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
    #[serde(default)]
    pub payment_means: PaymentMeansConfig,
}
