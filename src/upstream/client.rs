use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, Response, Url};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::token::TokenPolicy;
use crate::cache::token_cache::TokenCache;
use crate::config::types::ServiceConfig;
use crate::config::upstream::UpstreamConfig;
use crate::error::GatewayError;
use crate::resilience::retry::{run_with_reauth, CallOutcome};
use crate::upstream::http_client::base_headers;
use crate::upstream::login::CredentialLogin;
use crate::utils::constants::OPERATIONS_SEGMENT;

/// One logical call to the subscription API.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub headers: HeaderMap,
}

impl UpstreamRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post_json(url: impl Into<String>, body: Value) -> Self {
        let mut request = Self::new(Method::POST, url);
        request.body = Some(body);
        request
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Authenticated client for the subscription API.
///
/// Owns the process-wide token cache and the shared connection pool.
#[derive(Debug)]
pub struct UpstreamClient {
    http: Client,
    tokens: TokenCache,
    base_url: String,
    api_base: String,
}

impl UpstreamClient {
    pub fn new(http: Client, upstream: &UpstreamConfig, policy: TokenPolicy) -> Self {
        Self {
            tokens: TokenCache::new(CredentialLogin::new(http.clone(), upstream), policy),
            http,
            base_url: upstream.base_url.clone(),
            api_base: upstream.api_base(),
        }
    }

    pub fn from_config(config: &ServiceConfig, http: Client) -> Result<Self> {
        let policy = TokenPolicy::new(
            std::time::Duration::from_secs(config.token.validity_window_seconds),
            std::time::Duration::from_secs(config.token.safety_margin_seconds),
        )?;
        Ok(Self::new(http, &config.upstream, policy))
    }

    /// Logs in ahead of the first request. A failure is only logged, the
    /// first call will try again.
    pub async fn open(&self) {
        match self.tokens.force_login().await {
            Ok(_) => info!("startup login succeeded"),
            Err(e) => warn!("startup login deferred: {}", e),
        }
    }

    pub async fn close(&self) {
        self.tokens.clear().await;
        info!("upstream client closed");
    }

    pub fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    /// `<base><prefix>/cgaOnlineSales/<operation>`
    pub fn api_url(&self, operation: &str) -> String {
        format!("{}/{}/{}", self.api_base, OPERATIONS_SEGMENT, operation)
    }

    /// Same as `api_url` with percent-encoded path segments appended.
    pub fn api_url_with(&self, operation: &str, segments: &[&str]) -> Result<String, GatewayError> {
        let mut url = Url::parse(&self.api_url(operation))
            .map_err(|e| GatewayError::Configuration(format!("invalid upstream base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| GatewayError::Configuration("upstream base url cannot have a path".to_string()))?
            .extend(segments);
        Ok(url.into())
    }

    /// Resolves a report link returned by upstream against its base host.
    ///
    /// The bearer token is attached to whatever this returns, so absolute
    /// links must point at the upstream origin (scheme, host and port).
    pub fn resolve_report_url(&self, report_url: &str) -> Result<String, GatewayError> {
        let base = Url::parse(&format!("{}/", self.base_url))
            .map_err(|e| GatewayError::Configuration(format!("invalid upstream base url: {}", e)))?;
        let resolved = if report_url.starts_with("http") {
            Url::parse(report_url)
        } else {
            base.join(report_url.trim_start_matches('/'))
        }
        .map_err(|e| GatewayError::InvalidRequest(format!("invalid reportUrl: {}", e)))?;

        if resolved.origin() != base.origin() {
            return Err(GatewayError::InvalidRequest(format!(
                "reportUrl must point at {}",
                base.origin().ascii_serialization()
            )));
        }
        Ok(resolved.into())
    }

    /// Sends `request` with a bearer token. A 401 triggers one forced login
    /// and one more attempt; every other status is returned as is.
    pub async fn authenticated_call(&self, request: UpstreamRequest) -> Result<Response, GatewayError> {
        let token = self.tokens.ensure_valid_token().await?;
        let request = &request;

        let outcome = run_with_reauth(
            token,
            |token| self.send(request, token),
            || self.tokens.force_login(),
        )
        .await?;

        if let CallOutcome::RetryRejected(_) = &outcome {
            warn!("{} {} still unauthorized after re-login", request.method, request.url);
        }
        Ok(outcome.into_inner())
    }

    async fn send(&self, request: &UpstreamRequest, token: String) -> Result<Response, GatewayError> {
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| GatewayError::AuthenticationMalformed)?;
        bearer.set_sensitive(true);

        let mut headers = base_headers();
        headers.extend(request.headers.clone());
        // caller headers never override the token
        headers.insert(AUTHORIZATION, bearer);

        let mut builder = self
            .http
            .request(request.method.clone(), &request.url)
            .headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!("{} {}", request.method, request.url);
        Ok(builder.send().await?)
    }
}
