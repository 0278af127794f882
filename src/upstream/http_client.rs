use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;

use crate::config::settings::TimeoutsConfig;

/// Headers sent on every upstream call.
pub fn base_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Builds the single connection pool shared by every upstream call.
/// Timeouts apply to each HTTP attempt, not to a logical call.
pub fn build_http_client(timeouts: &TimeoutsConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(timeouts.connect())
        .read_timeout(timeouts.read())
        .timeout(timeouts.per_attempt())
        .build()
        .context("failed to build HTTP client")
}
