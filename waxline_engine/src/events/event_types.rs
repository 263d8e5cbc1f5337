use serde::{Deserialize, Serialize};

use crate::db_types::OrderId;

/// Announcement that a settlement succeeded and the order is now `Paid`.
///
/// Payloads carry the order id and nothing else. Listeners re-fetch whatever order detail they
/// need from the store, which keeps the announcement cheap to clone and impossible to go stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSettledEvent {
    pub order_id: OrderId,
}

impl OrderSettledEvent {
    pub fn new(order_id: OrderId) -> Self {
        Self { order_id }
    }
}

/// Announcement that a settlement failed or expired and the order is now `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSettlementFailedEvent {
    pub order_id: OrderId,
}

impl OrderSettlementFailedEvent {
    pub fn new(order_id: OrderId) -> Self {
        Self { order_id }
    }
}
