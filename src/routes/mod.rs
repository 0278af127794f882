//! Inbound gateway surface.

use axum::{response::Response, Router};
use serde::Serialize;

use crate::error::GatewayError;
use crate::server::response::to_json_response;
use crate::server::server::AppState;
use crate::upstream::client::UpstreamRequest;

pub mod auth;
pub mod catalog;
pub mod health;
pub mod payment_means;
pub mod recharge;
pub mod report;
pub mod stateless;

/// Every route behind the API key check.
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(catalog::router())
        .merge(stateless::router())
        .merge(payment_means::router())
        .merge(recharge::router())
        .merge(report::router())
}

/// One authenticated upstream call, answered verbatim.
pub(crate) async fn forward(state: &AppState, request: UpstreamRequest) -> Result<Response, GatewayError> {
    let response = state.upstream.authenticated_call(request).await?;
    to_json_response(response).await
}

pub(crate) fn to_body<T: Serialize>(payload: &T) -> Result<serde_json::Value, GatewayError> {
    serde_json::to_value(payload)
        .map_err(|e| GatewayError::InvalidRequest(format!("unserializable body: {}", e)))
}
