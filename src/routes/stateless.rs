//! Write passthrough: the JSON body goes to upstream as received, unknown
//! fields included.

use axum::{extract::State, response::Response, routing::post, Json, Router};

use crate::error::GatewayError;
use crate::models::requests::{
    BasketStatelessRequest, OffersStatelessRequest, OptionsStatelessRequest, QuickRenewalRequest,
};
use crate::routes::{forward, to_body};
use crate::server::server::AppState;
use crate::upstream::client::UpstreamRequest;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/offers/stateless", post(offers))
        .route("/options/stateless", post(options))
        .route("/basket/stateless", post(basket))
        .route("/register-quick-renewal", post(register_quick_renewal))
}

async fn post_operation<T: serde::Serialize>(
    state: &AppState,
    operation: &str,
    payload: &T,
) -> Result<Response, GatewayError> {
    let url = state.upstream.api_url(operation);
    forward(state, UpstreamRequest::post_json(url, to_body(payload)?)).await
}

async fn offers(
    State(state): State<AppState>,
    Json(payload): Json<OffersStatelessRequest>,
) -> Result<Response, GatewayError> {
    post_operation(&state, "getAvailableOffersStateless", &payload).await
}

async fn options(
    State(state): State<AppState>,
    Json(payload): Json<OptionsStatelessRequest>,
) -> Result<Response, GatewayError> {
    post_operation(&state, "getAvailableOptionsStateless", &payload).await
}

async fn basket(
    State(state): State<AppState>,
    Json(payload): Json<BasketStatelessRequest>,
) -> Result<Response, GatewayError> {
    post_operation(&state, "getBasketStateless", &payload).await
}

async fn register_quick_renewal(
    State(state): State<AppState>,
    Json(payload): Json<QuickRenewalRequest>,
) -> Result<Response, GatewayError> {
    post_operation(&state, "registerQuickRenewal", &payload).await
}
