use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::error::GatewayError;
use crate::server::server::AppState;
use crate::utils::constants::API_KEY_HEADER;

/// Rejects requests whose `X-API-KEY` differs from the configured key.
/// Without a configured key the gateway is open.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, GatewayError> {
    if let Some(expected) = state.api_key.as_deref() {
        let presented = request
            .headers()
            .get(API_KEY_HEADER)
            .map(|v| v.as_bytes())
            .unwrap_or_default();
        if !key_matches(presented, expected) {
            debug!("rejected {} with invalid api key", request.uri().path());
            return Err(GatewayError::Unauthorized);
        }
    }
    Ok(next.run(request).await)
}

/// Constant time in the key content; only a length mismatch returns early.
fn key_matches(presented: &[u8], expected: &str) -> bool {
    presented.ct_eq(expected.as_bytes()).into()
}
