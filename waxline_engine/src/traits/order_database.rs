use thiserror::Error;

use crate::db_types::{NewOrder, Order, OrderId, OrderStatus};

/// Which orders a read is allowed to see.
///
/// Listing every order in the store is an administrative privilege. Forcing callers to spell
/// out `OrderScope::All` keeps that escalation visible at the call site instead of hiding it
/// behind a nullable customer id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderScope {
    /// Only orders owned by this customer.
    Customer(String),
    /// Every order in the store, regardless of owner.
    All,
}

/// Persistence contract for the order aggregate.
///
/// The store enforces per-order durability and owner checks. Status-machine legality is
/// [`crate::OrderFlowApi`]'s job; it calls [`OrderDatabase::update_order_status`] as its
/// persistence primitive.
#[allow(async_fn_in_trait)]
pub trait OrderDatabase {
    /// Persists a new order together with its line items in a single atomic transaction.
    /// Either the whole aggregate lands, or nothing does.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderStoreError>;

    /// Fetches one order with its line items.
    async fn fetch_order_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError>;

    /// Fetches the orders visible in `scope`, newest first.
    async fn fetch_orders(&self, scope: OrderScope) -> Result<Vec<Order>, OrderStoreError>;

    /// Sets the order status unconditionally and bumps `updated_at`. No legality check is made
    /// against the current status; the caller owns that policy.
    async fn update_order_status(&self, order_id: &OrderId, status: OrderStatus) -> Result<Order, OrderStoreError>;

    /// Records the payment provider's session id on the order. The customer id doubles as an
    /// authorisation check: the update only lands if `customer_id` owns the order.
    async fn set_checkout_session(
        &self,
        order_id: &OrderId,
        customer_id: &str,
        session_id: &str,
    ) -> Result<Order, OrderStoreError>;
}

#[derive(Debug, Clone, Error)]
pub enum OrderStoreError {
    #[error("We have an internal database engine error: {0}")]
    DatabaseError(String),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderId),
}

impl From<sqlx::Error> for OrderStoreError {
    fn from(e: sqlx::Error) -> Self {
        OrderStoreError::DatabaseError(e.to_string())
    }
}
