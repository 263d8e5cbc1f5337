use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;
use uuid::Uuid;
use wax_common::Cents;

//--------------------------------------       OrderId       ---------------------------------------------------------
/// Opaque identifier for one checkout attempt. Generated once at creation and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    /// Mints a fresh order id.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------      ListingId      ---------------------------------------------------------
/// Reference to a catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct ListingId(pub String);

impl ListingId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ListingId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ListingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for ListingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------     OrderStatus     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatus {
    /// The order has been created and no settlement notification has arrived yet.
    Pending,
    /// The payment provider reported a successful settlement.
    Paid,
    /// The payment provider reported a failed or expired settlement.
    Failed,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "Pending"),
            OrderStatus::Paid => write!(f, "Paid"),
            OrderStatus::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Paid" => Ok(Self::Paid),
            "Failed" => Ok(Self::Failed),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to Pending");
            OrderStatus::Pending
        })
    }
}

//--------------------------------------      LineItem       ---------------------------------------------------------
/// One catalog reference with its price as it stood at order-creation time. Later catalog price
/// changes never touch an existing order.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct LineItem {
    pub id: i64,
    pub listing_id: ListingId,
    pub unit_price: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    pub listing_id: ListingId,
    pub unit_price: Cents,
}

//--------------------------------------        Order        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub customer_id: String,
    pub items: Vec<LineItem>,
    pub total_amount: Cents,
    pub currency: String,
    pub status: OrderStatus,
    pub checkout_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       NewOrder      ---------------------------------------------------------
/// A validated order aggregate, ready for insertion. The total is computed once, here, and is
/// never recomputed from the catalog again.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_id: OrderId,
    pub customer_id: String,
    pub items: Vec<NewLineItem>,
    pub total_amount: Cents,
    pub currency: String,
}

impl NewOrder {
    pub fn new(customer_id: String, items: Vec<NewLineItem>, currency: String) -> Self {
        let total_amount = items.iter().map(|item| item.unit_price).sum();
        Self { order_id: OrderId::random(), customer_id, items, total_amount, currency }
    }
}

//--------------------------------------       Listing       ---------------------------------------------------------
/// A catalog row as seen through the lookup boundary.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub artist: String,
    pub unit_price: Cents,
    pub currency: String,
}

//--------------------------------------   CustomerContact   ---------------------------------------------------------
/// The slice of an account that notification listeners need: somewhere to send mail, and a name
/// to open the message with.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CustomerContact {
    #[sqlx(rename = "id")]
    pub customer_id: String,
    pub email: String,
    pub first_name: String,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn order_status_round_trips_through_strings() {
        for status in [OrderStatus::Pending, OrderStatus::Paid, OrderStatus::Failed] {
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("Shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn new_order_totals_its_line_items() {
        let items = vec![
            NewLineItem { listing_id: "a".into(), unit_price: Cents::from(1000) },
            NewLineItem { listing_id: "b".into(), unit_price: Cents::from(2500) },
        ];
        let order = NewOrder::new("cust-1".into(), items, "USD".into());
        assert_eq!(order.total_amount, Cents::from(3500));
    }

    #[test]
    fn order_ids_are_unique() {
        assert_ne!(OrderId::random(), OrderId::random());
    }
}
