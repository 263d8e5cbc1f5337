use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use wax_common::Cents;

//--------------------------------------   Checkout session   --------------------------------------------------------
/// One price line of a checkout session. Quantity is always 1: an order that contains the same
/// listing twice carries it as two separate line items, not as a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceLine {
    pub name: String,
    pub currency: String,
    pub unit_amount: Cents,
}

/// Request data for a new checkout session. `order_id` travels as opaque session metadata; it is
/// the only correlation key the webhook gets back.
#[derive(Debug, Clone, Serialize)]
pub struct NewCheckoutSession {
    pub order_id: String,
    pub lines: Vec<PriceLine>,
    pub success_url: String,
    pub cancel_url: String,
}

impl NewCheckoutSession {
    /// Flattens the request into the bracketed form fields of Stripe's
    /// `POST /v1/checkout/sessions`.
    pub fn to_form(&self) -> Vec<(String, String)> {
        let mut form = vec![
            ("mode".to_string(), "payment".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("success_url".to_string(), self.success_url.clone()),
            ("cancel_url".to_string(), self.cancel_url.clone()),
            ("metadata[orderId]".to_string(), self.order_id.clone()),
        ];
        for (i, line) in self.lines.iter().enumerate() {
            form.push((format!("line_items[{i}][quantity]"), "1".to_string()));
            form.push((format!("line_items[{i}][price_data][currency]"), line.currency.to_lowercase()));
            form.push((format!("line_items[{i}][price_data][unit_amount]"), line.unit_amount.value().to_string()));
            form.push((format!("line_items[{i}][price_data][product_data][name]"), line.name.clone()));
        }
        form
    }
}

/// The slice of Stripe's checkout session object this system cares about. The `url` is where the
/// buyer gets redirected; Stripe may omit it, which callers must treat as a fatal integration
/// error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

//--------------------------------------    Webhook events    --------------------------------------------------------
pub const EVENT_CHECKOUT_COMPLETED: &str = "checkout.session.completed";
pub const EVENT_ASYNC_PAYMENT_SUCCEEDED: &str = "checkout.session.async_payment_succeeded";
pub const EVENT_PAYMENT_FAILED: &str = "payment_intent.payment_failed";
pub const EVENT_ASYNC_PAYMENT_FAILED: &str = "checkout.session.async_payment_failed";
pub const EVENT_SESSION_EXPIRED: &str = "checkout.session.expired";

/// A verified webhook event. Only the envelope fields needed for classification are decoded;
/// the rest of the payload is provider detail this system never looks at.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub object: EventObject,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventObject {
    pub id: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Event {
    /// The order id this event correlates to, if the provider echoed one back.
    pub fn order_id(&self) -> Option<&str> {
        self.data.object.metadata.get("orderId").map(|s| s.trim()).filter(|s| !s.is_empty())
    }
}

/// The internal reading of one provider event. `Ignored` is a first-class outcome, not an error:
/// the provider adds event types over time and intake must stay forward-compatible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    SettlementSucceeded { order_id: String },
    SettlementFailed { order_id: String },
    Ignored { event_type: String },
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn checkout_form_encodes_one_line_per_item() {
        let request = NewCheckoutSession {
            order_id: "order-1".to_string(),
            lines: vec![
                PriceLine { name: "Blue Train".to_string(), currency: "USD".to_string(), unit_amount: Cents::from(1000) },
                PriceLine { name: "Kind of Blue".to_string(), currency: "USD".to_string(), unit_amount: Cents::from(2500) },
            ],
            success_url: "https://waxline.test/orders".to_string(),
            cancel_url: "https://waxline.test/orders".to_string(),
        };
        let form = request.to_form();
        let get = |k: &str| form.iter().find(|(key, _)| key == k).map(|(_, v)| v.as_str());
        assert_eq!(get("mode"), Some("payment"));
        assert_eq!(get("metadata[orderId]"), Some("order-1"));
        assert_eq!(get("line_items[0][quantity]"), Some("1"));
        assert_eq!(get("line_items[0][price_data][currency]"), Some("usd"));
        assert_eq!(get("line_items[0][price_data][unit_amount]"), Some("1000"));
        assert_eq!(get("line_items[1][price_data][product_data][name]"), Some("Kind of Blue"));
        assert_eq!(get("line_items[1][price_data][unit_amount]"), Some("2500"));
    }

    #[test]
    fn order_id_extraction_trims_and_rejects_empty() {
        let json = r#"{"type":"checkout.session.completed","data":{"object":{"id":"cs_1","metadata":{"orderId":"  order-9  "}}}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.order_id(), Some("order-9"));

        let json = r#"{"type":"checkout.session.completed","data":{"object":{"id":"cs_1","metadata":{"orderId":"   "}}}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.order_id(), None);

        let json = r#"{"type":"checkout.session.completed","data":{"object":{"id":"cs_1"}}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.order_id(), None);
    }
}
