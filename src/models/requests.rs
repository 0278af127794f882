//! Inbound request bodies.
//!
//! Known fields are typed, anything else lands in `extra` and is forwarded to
//! upstream untouched. Absent optional fields are not serialized.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OffersStatelessRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriber_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distributor_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_id: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsStatelessRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriber_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distributor_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_id: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketItem {
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default = "default_quantity", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketStatelessRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriber_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distributor_number: Option<String>,
    #[serde(default)]
    pub items: Vec<BasketItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickRenewalRequest {
    pub subscriber_id: String,
    pub card_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distributor_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    /// kept as a JSON number so `1000` is not re-emitted as `1000.0`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QuickRenewalRequest {
    /// Copies amount, offer code and duration from a basket response for the
    /// fields the caller left empty.
    pub fn prefill_from_basket(&mut self, basket_response: &Value) {
        // the composed basket sits under "basket"; tolerate a flat payload too
        let basket = basket_response
            .get("basket")
            .filter(|b| b.is_object())
            .unwrap_or(basket_response);

        if self.amount.is_none() {
            if let Some(Value::Number(amount)) = basket.get("firstAmount") {
                self.amount = Some(amount.clone());
            }
        }

        if is_blank(&self.offer_code) {
            if let Some(code) = basket
                .pointer("/selectedOffer/offerCode")
                .and_then(Value::as_str)
                .filter(|code| !code.is_empty())
            {
                self.offer_code = Some(code.to_owned());
            }
        }

        if is_blank(&self.duration) {
            if let Some(duration) = basket.get("duration").and_then(duration_to_string) {
                self.duration = Some(duration);
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RechargeFlowRequest {
    pub basket: BasketStatelessRequest,
    pub quick_renewal: QuickRenewalRequest,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDownloadRequest {
    /// e.g. `/reports/frameset?__format=PDF...`
    pub report_url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_quantity() -> Option<i64> {
    Some(1)
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Zero and empty durations count as absent.
fn duration_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
