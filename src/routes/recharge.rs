//! Recharge: basket composition, payment-means lookup, renewal registration.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::GatewayError;
use crate::models::requests::RechargeFlowRequest;
use crate::routes::to_body;
use crate::server::response::{read_json, to_json_response};
use crate::server::server::AppState;
use crate::upstream::client::UpstreamRequest;
use crate::utils::constants::{MANAGEMENT_ACT_RENEWAL_QUICK, SEVERITY_SUCCESS};

pub fn router() -> Router<AppState> {
    Router::new().route("/recharge", post(recharge))
}

async fn recharge(
    State(state): State<AppState>,
    Json(flow): Json<RechargeFlowRequest>,
) -> Result<Response, GatewayError> {
    let upstream = &state.upstream;

    // 1) basket
    let basket_request = UpstreamRequest::post_json(
        upstream.api_url("getBasketStateless"),
        to_body(&flow.basket)?,
    );
    let basket_response = upstream.authenticated_call(basket_request).await?;
    if basket_response.status() != StatusCode::OK {
        return to_json_response(basket_response).await;
    }
    let (_, basket) = read_json(basket_response).await?;
    if basket.get("severity").and_then(Value::as_str) != Some(SEVERITY_SUCCESS) {
        return Err(GatewayError::BusinessFailure {
            detail: "basket not SUCCESS".to_string(),
            step: "basket",
            payload: basket,
        });
    }

    // 2) payment means, informational only
    let payment_means = lookup_payment_means(&state).await;

    // 3) renewal registration
    let mut renewal = flow.quick_renewal;
    renewal.prefill_from_basket(&basket);
    let renewal_request = UpstreamRequest::post_json(
        upstream.api_url("registerQuickRenewal"),
        to_body(&renewal)?,
    );
    let (status, registration) =
        read_json(upstream.authenticated_call(renewal_request).await?).await?;

    let report_url = registration
        .get("reportUrl")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty());
    let report_url_absolute = report_url.and_then(|url| {
        upstream
            .resolve_report_url(url)
            .inspect_err(|e| warn!("cannot resolve reportUrl: {}", e))
            .ok()
    });
    info!(
        "recharge finished status={} severity={:?}",
        status.as_u16(),
        registration.get("severity")
    );

    let body = json!({
        "status": registration.get("severity"),
        "message": registration.get("message"),
        "reportUrl": report_url,
        "reportUrlAbsolute": report_url_absolute,
        "steps": {
            "basket": basket,
            "paymentMeansQuick": payment_means,
            "registerQuickRenewal": registration,
        },
    });
    Ok((status, Json(body)).into_response())
}

/// Any failure here becomes `null` in the composite response.
async fn lookup_payment_means(state: &AppState) -> Option<Value> {
    if !state.payment_means.is_configured() {
        return None;
    }
    let query = state
        .payment_means
        .default_query(MANAGEMENT_ACT_RENEWAL_QUICK);
    let response = match state.payment_means.lookup(&query).await {
        Ok(response) => response,
        Err(e) => {
            warn!("payment means lookup failed: {}", e);
            return None;
        }
    };
    read_json(response)
        .await
        .map(|(_, body)| body)
        .inspect_err(|e| warn!("payment means body unreadable: {}", e))
        .ok()
}
