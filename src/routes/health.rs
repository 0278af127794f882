use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::server::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "token_cached": state.upstream.tokens().has_token().await,
    }))
}
