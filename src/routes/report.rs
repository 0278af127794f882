use axum::{
    body::Body,
    extract::{Query, State},
    http::{
        header::{ACCEPT, CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use crate::error::GatewayError;
use crate::helpers::report::{validate_report_url, ReportAttachment};
use crate::models::requests::ReportDownloadRequest;
use crate::server::response::to_json_response;
use crate::server::server::AppState;
use crate::upstream::client::UpstreamRequest;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/report/download",
        get(download_from_query).post(download_from_body),
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportQuery {
    report_url: String,
}

async fn download_from_query(
    State(state): State<AppState>,
    Query(q): Query<ReportQuery>,
) -> Result<Response, GatewayError> {
    download(&state, &q.report_url).await
}

async fn download_from_body(
    State(state): State<AppState>,
    Json(body): Json<ReportDownloadRequest>,
) -> Result<Response, GatewayError> {
    download(&state, &body.report_url).await
}

/// Validates before any upstream traffic, then streams the report back.
async fn download(state: &AppState, report_url: &str) -> Result<Response, GatewayError> {
    validate_report_url(report_url)?;
    let url = state.upstream.resolve_report_url(report_url)?;

    let request = UpstreamRequest::get(url.clone()).with_header(ACCEPT, HeaderValue::from_static("*/*"));
    let response = state.upstream.authenticated_call(request).await?;
    if !response.status().is_success() {
        return to_json_response(response).await;
    }

    let attachment = ReportAttachment::from_upstream(&url, response.headers());
    info!("streaming report {} as {}", attachment.filename, attachment.content_type);

    let content_type = HeaderValue::from_str(&attachment.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    // filenames with control characters fall back to a bare attachment
    let disposition = HeaderValue::from_str(&attachment.content_disposition())
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, content_type), (CONTENT_DISPOSITION, disposition)],
        Body::from_stream(response.bytes_stream()),
    )
        .into_response())
}
