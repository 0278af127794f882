use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::error::GatewayError;

/// Reads an upstream body as JSON; anything else is wrapped as `{"raw": text}`.
pub async fn read_json(response: reqwest::Response) -> Result<(StatusCode, Value), GatewayError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| json!({ "raw": String::from_utf8_lossy(&bytes) }));
    Ok((status, body))
}

/// Mirrors the upstream status and body to the gateway client.
pub async fn to_json_response(response: reqwest::Response) -> Result<Response, GatewayError> {
    let (status, body) = read_json(response).await?;
    Ok((status, Json(body)).into_response())
}
