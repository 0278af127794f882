use axum::{
    extract::{Query, State},
    response::Response,
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::error::GatewayError;
use crate::server::response::to_json_response;
use crate::server::server::AppState;
use crate::upstream::payment_means::PaymentMeansQuery;
use crate::utils::constants::{MANAGEMENT_ACT_FLASH_RENEWAL, MANAGEMENT_ACT_RENEWAL_QUICK};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bomi/payment-means", get(payment_means))
        .route("/bomi/payment-means/quick", get(payment_means_quick))
}

/// Every parameter falls back to the configured default.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentMeansParams {
    country_id: Option<String>,
    management_act: Option<String>,
    sale_device_id: Option<String>,
    distributor_id: Option<String>,
}

impl PaymentMeansParams {
    fn into_query(self, defaults: PaymentMeansQuery) -> PaymentMeansQuery {
        fn pick(value: Option<String>, default: String) -> String {
            value.filter(|v| !v.is_empty()).unwrap_or(default)
        }
        PaymentMeansQuery {
            country_id: pick(self.country_id, defaults.country_id),
            management_act: pick(self.management_act, defaults.management_act),
            sale_device_id: pick(self.sale_device_id, defaults.sale_device_id),
            distributor_id: pick(self.distributor_id, defaults.distributor_id),
        }
    }
}

async fn lookup(
    state: &AppState,
    params: PaymentMeansParams,
    management_act: &str,
) -> Result<Response, GatewayError> {
    let query = params.into_query(state.payment_means.default_query(management_act));
    let response = state.payment_means.lookup(&query).await?;
    to_json_response(response).await
}

async fn payment_means(
    State(state): State<AppState>,
    Query(params): Query<PaymentMeansParams>,
) -> Result<Response, GatewayError> {
    lookup(&state, params, MANAGEMENT_ACT_FLASH_RENEWAL).await
}

async fn payment_means_quick(
    State(state): State<AppState>,
    Query(params): Query<PaymentMeansParams>,
) -> Result<Response, GatewayError> {
    lookup(&state, params, MANAGEMENT_ACT_RENEWAL_QUICK).await
}
