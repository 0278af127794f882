// Exercises /recharge end to end: basket composition, the informational
// payment-means lookup and the renewal registration prefilled from the
// basket reply.

#[cfg(test)]
mod test {

use http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::tests::common::{
    build_reqwest_client, closed_port_url, gateway_config, json, json_reply, spawn_gateway,
    MockUpstream, Recorded,
};

const REPORT_URL: &str = "/reports/frameset?__format=pdf&id=9";

fn basket_success() -> Value {
    json!({
        "severity": "SUCCESS",
        "basket": {
            "firstAmount": 1000,
            "duration": 30,
            "selectedOffer": {"offerCode": "X1", "label": "Evasion"}
        }
    })
}

fn happy_upstream(r: &Recorded) -> Response {
    match r.operation() {
        Some("getBasketStateless") => json_reply(StatusCode::OK, basket_success()),
        Some("registerQuickRenewal") => json_reply(
            StatusCode::OK,
            json!({"severity": "SUCCESS", "message": "renewed", "reportUrl": REPORT_URL}),
        ),
        _ if r.path == "/api/v1/paymentMeans" => {
            json_reply(StatusCode::OK, json!([{"code": "CASH"}, {"code": "OM"}]))
        }
        _ => json_reply(StatusCode::NOT_FOUND, json!({"error": "unexpected"})),
    }
}

fn recharge_body(quick_renewal: Value) -> Value {
    json!({
        "basket": {
            "subscriberId": "S1",
            "cardIndex": 0,
            "items": [{"type": "OFFER", "code": "X1"}]
        },
        "quickRenewal": quick_renewal
    })
}

async fn post_recharge(gateway: &str, body: &Value) -> (StatusCode, Value) {
    let response = build_reqwest_client()
        .post(format!("{}/recharge", gateway))
        .json(body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn renewal_is_prefilled_from_the_basket() {
    let mock = MockUpstream::new(happy_upstream);
    let (_u, upstream) = mock.spawn().await;
    let cfg = gateway_config(&upstream, Some(upstream.clone()));
    let (_g, gateway, _state) = spawn_gateway(&cfg).await;

    let (status, body) = post_recharge(
        &gateway,
        &recharge_body(json!({"subscriberId": "S1", "cardIndex": 0, "paymentMethod": "CASH"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SUCCESS");
    assert_eq!(body["message"], "renewed");
    assert_eq!(body["reportUrl"], REPORT_URL);
    assert_eq!(body["reportUrlAbsolute"], format!("{}{}", upstream, REPORT_URL));
    assert_eq!(body["steps"]["basket"], basket_success());
    assert_eq!(body["steps"]["paymentMeansQuick"], json!([{"code": "CASH"}, {"code": "OM"}]));
    assert_eq!(body["steps"]["registerQuickRenewal"]["severity"], "SUCCESS");

    let basket = mock.requests_for("getBasketStateless");
    assert_eq!(basket.len(), 1);
    assert_eq!(basket[0].body.as_ref().unwrap()["items"][0]["quantity"], 1);

    let renewal = mock.requests_for("registerQuickRenewal");
    assert_eq!(renewal.len(), 1);
    assert_eq!(
        renewal[0].body,
        Some(json!({
            "subscriberId": "S1",
            "cardIndex": 0,
            "paymentMethod": "CASH",
            "amount": 1000,
            "offerCode": "X1",
            "duration": "30"
        }))
    );

    let lookups: Vec<_> = mock
        .requests()
        .into_iter()
        .filter(|r| r.path == "/api/v1/paymentMeans")
        .collect();
    assert_eq!(lookups.len(), 1);
    assert!(lookups[0]
        .query
        .as_deref()
        .unwrap_or_default()
        .contains("managementAct=RENEWAL_QUICK"));
}

#[tokio::test]
async fn caller_values_win_over_basket_values() {
    let mock = MockUpstream::new(happy_upstream);
    let (_u, upstream) = mock.spawn().await;
    let (_g, gateway, _state) = spawn_gateway(&gateway_config(&upstream, None)).await;

    let (status, body) = post_recharge(
        &gateway,
        &recharge_body(json!({"subscriberId": "S1", "cardIndex": 0, "amount": 500, "duration": "7"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // no provider configured, lookup skipped
    assert_eq!(body["steps"]["paymentMeansQuick"], Value::Null);

    let renewal = mock.requests_for("registerQuickRenewal");
    let sent = renewal[0].body.clone().unwrap();
    assert_eq!(sent["amount"], 500);
    assert_eq!(sent["duration"], "7");
    assert_eq!(sent["offerCode"], "X1");
}

#[tokio::test]
async fn basket_business_failure_stops_the_flow() {
    let failure = json!({"severity": "FAILURE", "message": "offer unavailable"});
    let reply = failure.clone();
    let mock = MockUpstream::new(move |_| json_reply(StatusCode::OK, reply.clone()));
    let (_u, upstream) = mock.spawn().await;
    let (_g, gateway, _state) =
        spawn_gateway(&gateway_config(&upstream, Some(upstream.clone()))).await;

    let (status, body) = post_recharge(
        &gateway,
        &recharge_body(json!({"subscriberId": "S1", "cardIndex": 0})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["detail"], "basket not SUCCESS");
    assert_eq!(body["basket"], failure);
    assert_eq!(mock.requests().len(), 1);
    assert!(mock.requests_for("registerQuickRenewal").is_empty());
}

#[tokio::test]
async fn basket_http_error_is_forwarded_verbatim() {
    let mock = MockUpstream::new(|_| {
        json_reply(StatusCode::BAD_REQUEST, json!({"errors": ["cardIndex invalid"]}))
    });
    let (_u, upstream) = mock.spawn().await;
    let (_g, gateway, _state) = spawn_gateway(&gateway_config(&upstream, None)).await;

    let (status, body) = post_recharge(
        &gateway,
        &recharge_body(json!({"subscriberId": "S1", "cardIndex": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"errors": ["cardIndex invalid"]}));
    assert!(mock.requests_for("registerQuickRenewal").is_empty());
}

#[tokio::test]
async fn unreachable_payment_provider_does_not_block_renewal() {
    let mock = MockUpstream::new(happy_upstream);
    let (_u, upstream) = mock.spawn().await;
    let (_g, gateway, _state) =
        spawn_gateway(&gateway_config(&upstream, Some(closed_port_url()))).await;

    let (status, body) = post_recharge(
        &gateway,
        &recharge_body(json!({"subscriberId": "S1", "cardIndex": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["steps"]["paymentMeansQuick"], Value::Null);
    assert_eq!(mock.requests_for("registerQuickRenewal").len(), 1);
}

#[tokio::test]
async fn renewal_status_is_mirrored() {
    let mock = MockUpstream::new(|r| match r.operation() {
        Some("getBasketStateless") => json_reply(StatusCode::OK, basket_success()),
        _ => json_reply(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"severity": "FAILURE", "message": "insufficient credit"}),
        ),
    });
    let (_u, upstream) = mock.spawn().await;
    let (_g, gateway, _state) = spawn_gateway(&gateway_config(&upstream, None)).await;

    let (status, body) = post_recharge(
        &gateway,
        &recharge_body(json!({"subscriberId": "S1", "cardIndex": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "FAILURE");
    assert_eq!(body["message"], "insufficient credit");
    assert_eq!(body["reportUrl"], Value::Null);
    assert_eq!(body["reportUrlAbsolute"], Value::Null);
}

#[tokio::test]
async fn missing_renewal_identity_is_rejected() {
    let mock = MockUpstream::new(happy_upstream);
    let (_u, upstream) = mock.spawn().await;
    let (_g, gateway, _state) = spawn_gateway(&gateway_config(&upstream, None)).await;

    let response = build_reqwest_client()
        .post(format!("{}/recharge", gateway))
        .json(&recharge_body(json!({"cardIndex": 0})))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_client_error());
    assert!(mock.requests().is_empty());
}

}
