use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::error::GatewayError;
use crate::server::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/authenticate", get(authenticate).post(authenticate))
}

/// Forces a fresh login even when the cached token is still valid.
async fn authenticate(State(state): State<AppState>) -> Result<Json<Value>, GatewayError> {
    state.upstream.tokens().force_login().await?;
    Ok(Json(json!({ "authenticated": true, "token_cached": true })))
}
