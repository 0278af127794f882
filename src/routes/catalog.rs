//! Read passthrough: one inbound GET, one upstream GET.

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::error::GatewayError;
use crate::helpers::query::compact_query;
use crate::routes::forward;
use crate::server::server::AppState;
use crate::upstream::client::UpstreamRequest;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/distributors", get(distributors))
        .route("/distributors/{number}/creditPDV", get(credit_pdv))
        .route("/distributors/{number}/rights", get(distributor_rights))
        .route("/subscribers", get(subscribers))
        .route("/countries", get(countries))
        .route("/solde-subscriber/{subscriber_id}/{card_index}", get(solde_subscriber))
        .route("/reactivate-possible/{subscriber_id}/{card_index}", get(reactivate_possible))
        .route("/available-coupons/{subscriber_id}/{card_index}", get(available_coupons))
        .route("/eligibility-appointment", get(eligibility_appointment))
        .route("/can-be-renewed", get(can_be_renewed))
        .route("/group-broadcasting-ways", get(group_broadcasting_ways))
        .route("/durations", get(durations))
        .route("/payment-methods", get(payment_methods))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscribersQuery {
    user_id: String,
    distributor_number: String,
    subscriber_number: Option<String>,
    phone_number: Option<String>,
    material_number: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequiredDateQuery {
    date_to_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DateQuery {
    #[serde(default = "default_date_to_date")]
    date_to_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DistributorDateQuery {
    #[serde(default = "default_date_to_date")]
    date_to_date: String,
    distributor_number: String,
}

/// upstream placeholder accepted when no date filter applies
fn default_date_to_date() -> String {
    "dd".to_string()
}

async fn get_operation(
    state: &AppState,
    operation: &str,
    query: Vec<(String, String)>,
) -> Result<Response, GatewayError> {
    let url = state.upstream.api_url(operation);
    forward(state, UpstreamRequest::get(url).with_query(query)).await
}

async fn get_card_operation(
    state: &AppState,
    operation: &str,
    subscriber_id: &str,
    card_index: i64,
) -> Result<Response, GatewayError> {
    let url = state
        .upstream
        .api_url_with(operation, &[subscriber_id, &card_index.to_string()])?;
    forward(state, UpstreamRequest::get(url)).await
}

fn date_query(date_to_date: String) -> Vec<(String, String)> {
    vec![("dateToDate".to_string(), date_to_date)]
}

fn distributor_date_query(q: DistributorDateQuery) -> Vec<(String, String)> {
    vec![
        ("dateToDate".to_string(), q.date_to_date),
        ("distributorNumber".to_string(), q.distributor_number),
    ]
}

async fn distributors(State(state): State<AppState>) -> Result<Response, GatewayError> {
    get_operation(&state, "getDistributors", Vec::new()).await
}

async fn credit_pdv(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Response, GatewayError> {
    let url = state
        .upstream
        .api_url_with("getDistributors", &[&number, "creditPDV"])?;
    forward(&state, UpstreamRequest::get(url)).await
}

async fn distributor_rights(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Response, GatewayError> {
    let url = state
        .upstream
        .api_url_with("getDistributors", &[&number, "rights"])?;
    forward(&state, UpstreamRequest::get(url)).await
}

async fn subscribers(
    State(state): State<AppState>,
    Query(q): Query<SubscribersQuery>,
) -> Result<Response, GatewayError> {
    let query = compact_query([
        ("userId", Some(q.user_id.as_str())),
        ("distributorNumber", Some(q.distributor_number.as_str())),
        ("subscriberNumber", q.subscriber_number.as_deref()),
        ("phoneNumber", q.phone_number.as_deref()),
        ("materialNumber", q.material_number.as_deref()),
        ("email", q.email.as_deref()),
    ]);
    get_operation(&state, "getSubscribers", query).await
}

async fn countries(State(state): State<AppState>) -> Result<Response, GatewayError> {
    get_operation(&state, "getCountries", Vec::new()).await
}

async fn solde_subscriber(
    State(state): State<AppState>,
    Path((subscriber_id, card_index)): Path<(String, i64)>,
) -> Result<Response, GatewayError> {
    get_card_operation(&state, "getSoldeSubscriber", &subscriber_id, card_index).await
}

async fn reactivate_possible(
    State(state): State<AppState>,
    Path((subscriber_id, card_index)): Path<(String, i64)>,
) -> Result<Response, GatewayError> {
    get_card_operation(&state, "isPossibleToReactivate", &subscriber_id, card_index).await
}

async fn available_coupons(
    State(state): State<AppState>,
    Path((subscriber_id, card_index)): Path<(String, i64)>,
) -> Result<Response, GatewayError> {
    get_card_operation(&state, "getAvailableCoupons", &subscriber_id, card_index).await
}

async fn eligibility_appointment(
    State(state): State<AppState>,
    Query(q): Query<RequiredDateQuery>,
) -> Result<Response, GatewayError> {
    get_operation(&state, "eligibilityAppointment", date_query(q.date_to_date)).await
}

async fn can_be_renewed(
    State(state): State<AppState>,
    Query(q): Query<DistributorDateQuery>,
) -> Result<Response, GatewayError> {
    get_operation(&state, "canBeRenewed", distributor_date_query(q)).await
}

async fn group_broadcasting_ways(
    State(state): State<AppState>,
    Query(q): Query<DateQuery>,
) -> Result<Response, GatewayError> {
    get_operation(&state, "getGroupBroadcastingWays", date_query(q.date_to_date)).await
}

async fn durations(
    State(state): State<AppState>,
    Query(q): Query<DistributorDateQuery>,
) -> Result<Response, GatewayError> {
    get_operation(&state, "getDurations", distributor_date_query(q)).await
}

async fn payment_methods(
    State(state): State<AppState>,
    Query(q): Query<DateQuery>,
) -> Result<Response, GatewayError> {
    get_operation(&state, "getPaymentMethods", date_query(q.date_to_date)).await
}
