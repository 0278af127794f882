use std::fmt;

use serde::Deserialize;

use crate::utils::constants::*;

/// ================================
/// Primary subscription API (token authenticated)
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub auth_path: String,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    pub credentials: Credentials,
}

impl UpstreamConfig {
    pub fn login_url(&self) -> String {
        format!("{}{}", self.base_url, self.auth_path)
    }

    pub fn api_base(&self) -> String {
        format!("{}{}", self.base_url, self.api_prefix)
    }
}

/// Loaded once at startup, never mutated afterwards.
#[derive(Deserialize, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// ================================
/// Payment-means provider (no token)
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct PaymentMeansConfig {
    /// unset disables every payment-means call
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_country_id")]
    pub country_id: String,
    #[serde(default = "default_sale_device_id")]
    pub sale_device_id: String,
    #[serde(default = "default_distributor_id")]
    pub distributor_id: String,
}

impl Default for PaymentMeansConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            country_id: default_country_id(),
            sale_device_id: default_sale_device_id(),
            distributor_id: default_distributor_id(),
        }
    }
}

fn default_api_prefix() -> String {
    DEFAULT_API_PREFIX.to_string()
}

fn default_country_id() -> String {
    DEFAULT_COUNTRY_ID.to_string()
}

fn default_sale_device_id() -> String {
    DEFAULT_SALE_DEVICE_ID.to_string()
}

fn default_distributor_id() -> String {
    DEFAULT_DISTRIBUTOR_ID.to_string()
}
