use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Errors surfaced by the gateway while talking to upstream or validating
/// an inbound request.
///
/// The type is `Clone` so that a single failed login can be handed to every
/// caller that was waiting on it.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Auth failed ({status})")]
    AuthenticationFailed { status: u16 },

    #[error("Auth: 'token' missing from login response")]
    AuthenticationMalformed,

    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(#[source] Arc<reqwest::Error>),

    /// Upstream answered 200 but its `severity` was not `SUCCESS`.
    #[error("{detail}")]
    BusinessFailure {
        detail: String,
        step: &'static str,
        payload: Value,
    },

    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("invalid X-API-KEY")]
    Unauthorized,
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::UpstreamUnavailable(Arc::new(err))
    }
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::AuthenticationFailed { .. } | GatewayError::AuthenticationMalformed => {
                StatusCode::BAD_GATEWAY
            }
            GatewayError::UpstreamUnavailable(err) if err.is_timeout() => {
                StatusCode::GATEWAY_TIMEOUT
            }
            GatewayError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            GatewayError::BusinessFailure { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            GatewayError::BusinessFailure {
                detail,
                step,
                payload,
            } => {
                let mut body = json!({ "detail": detail });
                body[*step] = payload.clone();
                body
            }
            // transport details stay in the logs
            GatewayError::UpstreamUnavailable(err) => {
                tracing::warn!("upstream transport error: {}", err);
                json!({ "detail": "upstream unavailable" })
            }
            other => json!({ "detail": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
