use reqwest::{Client, Response};
use serde::Serialize;
use tracing::debug;

use crate::config::upstream::PaymentMeansConfig;
use crate::error::GatewayError;
use crate::upstream::http_client::base_headers;
use crate::utils::constants::PAYMENT_MEANS_PATH;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMeansQuery {
    pub country_id: String,
    pub management_act: String,
    pub sale_device_id: String,
    pub distributor_id: String,
}

/// Read-only client for the payment-means provider. No token is attached.
#[derive(Debug, Clone)]
pub struct PaymentMeansClient {
    http: Client,
    config: PaymentMeansConfig,
}

impl PaymentMeansClient {
    pub fn new(http: Client, config: &PaymentMeansConfig) -> Self {
        Self {
            http,
            config: config.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.base_url.is_some()
    }

    /// Query with the configured country, device and distributor.
    pub fn default_query(&self, management_act: &str) -> PaymentMeansQuery {
        PaymentMeansQuery {
            country_id: self.config.country_id.clone(),
            management_act: management_act.to_owned(),
            sale_device_id: self.config.sale_device_id.clone(),
            distributor_id: self.config.distributor_id.clone(),
        }
    }

    pub async fn lookup(&self, query: &PaymentMeansQuery) -> Result<Response, GatewayError> {
        let base_url = self.config.base_url.as_deref().ok_or_else(|| {
            GatewayError::Configuration("payment means base url is not configured".to_string())
        })?;
        let url = format!("{}{}", base_url, PAYMENT_MEANS_PATH);

        debug!("GET {} managementAct={}", url, query.management_act);
        let response = self
            .http
            .get(&url)
            .headers(base_headers())
            .query(query)
            .send()
            .await?;
        Ok(response)
    }
}
