use std::{collections::HashSet, fmt::Debug};

use log::*;
use thiserror::Error;

use crate::{
    db_types::{ListingId, NewLineItem, NewOrder, Order, OrderId, OrderStatus},
    events::{EventProducers, OrderSettledEvent, OrderSettlementFailedEvent},
    traits::{CatalogLookup, OrderDatabase, OrderScope, OrderStoreError},
};

/// `OrderFlowApi` is the primary API for the order lifecycle: creating the order aggregate,
/// recording checkout sessions, and applying settlement outcomes delivered by the payment
/// provider.
///
/// Settlement applications carry no legality check against the current status. The provider
/// delivers notifications at least once and possibly out of order, so the policy is
/// last-write-wins: the most recently processed notification always overwrites the status, and
/// re-delivery of the same notification simply re-applies the same status. The corresponding
/// event is published after the write is durable, once per application, with no deduplication.
pub struct OrderFlowApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> OrderFlowApi<B>
where B: OrderDatabase
{
    /// Applies a successful settlement outcome to the order.
    ///
    /// The order must exist; beyond that the write is unconditional (see the struct docs for
    /// why). The updated order is persisted first, and only then is `OrderSettledEvent`
    /// published, so listeners can never observe an announcement for a status that is not yet
    /// visible to reads.
    pub async fn mark_paid(&self, order_id: &OrderId) -> Result<Order, OrderFlowError> {
        let existing = self
            .db
            .fetch_order_by_id(order_id)
            .await?
            .ok_or_else(|| OrderFlowError::OrderNotFound(order_id.clone()))?;
        if existing.status != OrderStatus::Pending {
            debug!(
                "🔄️ Order [{order_id}] was already {} and is being overwritten to Paid. This is expected under \
                 provider re-delivery.",
                existing.status
            );
        }
        let order = self.db.update_order_status(order_id, OrderStatus::Paid).await?;
        info!("🔄️ Order [{order_id}] marked as paid");
        self.call_order_settled_hook(&order).await;
        Ok(order)
    }

    /// Applies a failed or expired settlement outcome to the order. Same shape and same
    /// last-write-wins policy as [`Self::mark_paid`].
    pub async fn mark_failed(&self, order_id: &OrderId) -> Result<Order, OrderFlowError> {
        let existing = self
            .db
            .fetch_order_by_id(order_id)
            .await?
            .ok_or_else(|| OrderFlowError::OrderNotFound(order_id.clone()))?;
        if existing.status != OrderStatus::Pending {
            debug!(
                "🔄️ Order [{order_id}] was already {} and is being overwritten to Failed. This is expected under \
                 provider re-delivery.",
                existing.status
            );
        }
        let order = self.db.update_order_status(order_id, OrderStatus::Failed).await?;
        info!("🔄️ Order [{order_id}] marked as failed");
        self.call_settlement_failed_hook(&order).await;
        Ok(order)
    }

    /// Records the provider's checkout session id on the order, using the owner's id as the
    /// authorisation check. Re-recording while the order is still pending is allowed; that is
    /// how payment re-attempts work.
    pub async fn attach_checkout_session(
        &self,
        order_id: &OrderId,
        customer_id: &str,
        session_id: &str,
    ) -> Result<Order, OrderFlowError> {
        let order = self.db.set_checkout_session(order_id, customer_id, session_id).await?;
        debug!("🔄️ Order [{order_id}] now references checkout session {session_id}");
        Ok(order)
    }

    pub async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderFlowError> {
        let order = self.db.fetch_order_by_id(order_id).await?;
        Ok(order)
    }

    /// Fetches the orders visible in `scope`, newest first. Passing [`OrderScope::All`] is the
    /// administrative escalation; it is the caller's job to have checked the privilege.
    pub async fn fetch_orders(&self, scope: OrderScope) -> Result<Vec<Order>, OrderFlowError> {
        let orders = self.db.fetch_orders(scope).await?;
        Ok(orders)
    }

    async fn call_order_settled_hook(&self, order: &Order) {
        for producer in &self.producers.order_settled {
            trace!("🔄️ Notifying order settled hook subscriber");
            producer.publish_event(OrderSettledEvent::new(order.order_id.clone())).await;
        }
    }

    async fn call_settlement_failed_hook(&self, order: &Order) {
        for producer in &self.producers.settlement_failed {
            trace!("🔄️ Notifying settlement failed hook subscriber");
            producer.publish_event(OrderSettlementFailedEvent::new(order.order_id.clone())).await;
        }
    }
}

impl<B> OrderFlowApi<B>
where B: OrderDatabase + CatalogLookup
{
    /// Creates a new order for `customer_id` covering the given listings.
    ///
    /// Duplicate listing ids are collapsed (first occurrence wins). Every remaining id is
    /// resolved through the catalog; if any id fails to resolve the whole operation fails and
    /// nothing is persisted. Prices are captured as a snapshot and the total is their sum. The
    /// order's currency comes from the first resolved listing, and every other listing must
    /// agree with it.
    pub async fn create_order(&self, customer_id: &str, listing_ids: &[ListingId]) -> Result<Order, OrderFlowError> {
        let mut seen = HashSet::new();
        let unique: Vec<&ListingId> = listing_ids.iter().filter(|id| seen.insert((*id).clone())).collect();

        let mut listings = Vec::with_capacity(unique.len());
        for id in unique {
            let listing =
                self.db.fetch_listing(id).await?.ok_or_else(|| OrderFlowError::ListingNotFound(id.clone()))?;
            listings.push(listing);
        }
        let first = listings.first().ok_or(OrderFlowError::EmptyOrder)?;
        let currency = first.currency.clone();
        if let Some(odd) = listings.iter().find(|listing| listing.currency != currency) {
            return Err(OrderFlowError::MixedCurrencies(currency, odd.currency.clone()));
        }

        let items = listings
            .into_iter()
            .map(|listing| NewLineItem { listing_id: listing.id, unit_price: listing.unit_price })
            .collect::<Vec<_>>();
        let new_order = NewOrder::new(customer_id.to_string(), items, currency);
        let order = self.db.insert_order(new_order).await?;
        info!(
            "🔄️📦️ Order [{}] created for customer {customer_id}: {} item(s), {} {}",
            order.order_id,
            order.items.len(),
            order.total_amount,
            order.currency
        );
        Ok(order)
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Listing {0} does not exist")]
    ListingNotFound(ListingId),
    #[error("An order must contain at least one item")]
    EmptyOrder,
    #[error("Order items must share a single currency, but both {0} and {1} were requested")]
    MixedCurrencies(String, String),
    #[error(transparent)]
    StoreError(#[from] OrderStoreError),
}
