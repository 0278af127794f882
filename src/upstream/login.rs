use std::future::Future;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::config::upstream::{Credentials, UpstreamConfig};
use crate::error::GatewayError;
use crate::upstream::http_client::base_headers;

/// Login primitive used by the token cache.
pub trait FetchToken: Send + Sync {
    fn fetch_token(&self) -> impl Future<Output = Result<String, GatewayError>> + Send;
}

#[derive(Serialize)]
struct LoginPayload<'a> {
    #[serde(rename = "userName")]
    user_name: &'a str,
    password: &'a str,
}

/// Credential based login against the upstream auth endpoint.
#[derive(Debug, Clone)]
pub struct CredentialLogin {
    client: Client,
    url: String,
    credentials: Credentials,
}

impl CredentialLogin {
    pub fn new(client: Client, upstream: &UpstreamConfig) -> Self {
        Self {
            client,
            url: upstream.login_url(),
            credentials: upstream.credentials.clone(),
        }
    }
}

impl FetchToken for CredentialLogin {
    async fn fetch_token(&self) -> Result<String, GatewayError> {
        let mut headers = base_headers();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .client
            .post(&self.url)
            .headers(headers)
            .json(&LoginPayload {
                user_name: &self.credentials.username,
                password: &self.credentials.password,
            })
            .send()
            .await?;

        let status = response.status();
        info!("login status={} url={}", status.as_u16(), self.url);
        if status != StatusCode::OK {
            return Err(GatewayError::AuthenticationFailed {
                status: status.as_u16(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|_| GatewayError::AuthenticationMalformed)?;
        body.get("token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
            .ok_or(GatewayError::AuthenticationMalformed)
    }
}
