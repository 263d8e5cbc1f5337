use serde::{Deserialize, Serialize};
use waxline_engine::db_types::{ListingId, OrderId};

/// Request body for creating a new order. Duplicate listing ids are tolerated and collapsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderRequest {
    pub customer_id: String,
    pub listing_ids: Vec<ListingId>,
}

/// Response for a successful checkout: the buyer gets sent to `redirect_url` to pay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub order_id: OrderId,
    pub redirect_url: String,
}

/// The acknowledgement shape the payment provider expects. Anything in the 2xx range stops
/// redelivery, so this is returned on every processed or ignored event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
}

impl WebhookAck {
    pub fn received() -> Self {
        Self { received: true }
    }
}
