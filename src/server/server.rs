use std::sync::Arc;

use anyhow::Result;
use axum::{middleware, Router};
use tracing::info;

use crate::config::settings::ServerConfig;
use crate::config::types::ServiceConfig;
use crate::routes;
use crate::server::{api_key::require_api_key, shutdown};
use crate::upstream::client::UpstreamClient;
use crate::upstream::http_client::build_http_client;
use crate::upstream::payment_means::PaymentMeansClient;

/// Shared by every handler. The upstream client is the single owner of the
/// token cache.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
    pub payment_means: Arc<PaymentMeansClient>,
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(
        upstream: Arc<UpstreamClient>,
        payment_means: PaymentMeansClient,
        api_key: Option<String>,
    ) -> Self {
        Self {
            upstream,
            payment_means: Arc::new(payment_means),
            api_key: api_key.filter(|k| !k.is_empty()).map(Arc::from),
        }
    }

    /// Both upstreams share one connection pool.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let http = build_http_client(&config.timeouts)?;
        let upstream = UpstreamClient::from_config(config, http.clone())?;
        let payment_means = PaymentMeansClient::new(http, &config.payment_means);
        Ok(Self::new(
            Arc::new(upstream),
            payment_means,
            config.api_key.clone(),
        ))
    }
}

/// `/health` is always open, every other route goes through the API key check.
pub fn router(state: AppState) -> Router {
    let protected = routes::protected_router()
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .merge(routes::health::router())
        .merge(protected)
        .with_state(state)
}

/// Serve until a shutdown signal arrives, then close the upstream client.
pub async fn start(server_config: &ServerConfig, state: AppState) -> Result<()> {
    let upstream = state.upstream.clone();
    upstream.open().await;

    let bind_addr = format!("{}:{}", server_config.host, server_config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown::listen())
        .await?;

    upstream.close().await;
    Ok(())
}
