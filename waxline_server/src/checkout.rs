//! The checkout-session gateway.
//!
//! Turns a pending order into a redirectable payment page at the provider, and records the
//! provider's session id back onto the order. Session creation is synchronous and happens once
//! per user-initiated checkout: provider errors are not retried here, they surface to the
//! caller, and the order stays pending so the checkout can simply be attempted again.
use log::*;
use stripe_tools::{NewCheckoutSession, PriceLine, StripeApi};
use waxline_engine::{
    db_types::{Order, OrderStatus},
    traits::{CatalogLookup, OrderDatabase},
    OrderFlowApi,
};

use crate::{config::CheckoutUrls, errors::ServerError};

/// Opens a checkout session for `order` and returns the provider's redirect URL.
///
/// The order must still be pending; a settled order is refused before the provider is
/// contacted. One price line is built per line item with quantity fixed at 1 (an order holding
/// the same listing twice carries two line items). On success the session id is persisted via
/// the aggregate store, with the order owner's id as the authorisation check.
pub async fn open_checkout_session<B>(
    api: &OrderFlowApi<B>,
    stripe: &StripeApi,
    urls: &CheckoutUrls,
    order: &Order,
) -> Result<String, ServerError>
where
    B: OrderDatabase + CatalogLookup,
{
    if order.status != OrderStatus::Pending {
        debug!("💳️ Refusing to open a checkout session for order [{}]: status is {}", order.order_id, order.status);
        return Err(ServerError::OrderNotPending(order.order_id.clone()));
    }
    let mut lines = Vec::with_capacity(order.items.len());
    for item in &order.items {
        // The title is display detail only. A listing that has left the catalog since the order
        // was created falls back to its id; the captured price is what gets charged either way.
        let name = match api.db().fetch_listing(&item.listing_id).await? {
            Some(listing) => listing.title,
            None => item.listing_id.to_string(),
        };
        lines.push(PriceLine { name, currency: order.currency.clone(), unit_amount: item.unit_price });
    }
    let request = NewCheckoutSession {
        order_id: order.order_id.as_str().to_string(),
        lines,
        success_url: urls.success_url.clone(),
        cancel_url: urls.cancel_url.clone(),
    };
    let session = stripe.create_checkout_session(&request).await.map_err(|e| {
        warn!("💳️ Could not open a checkout session for order [{}]. {e}", order.order_id);
        ServerError::PaymentProviderError(e.to_string())
    })?;
    api.attach_checkout_session(&order.order_id, &order.customer_id, &session.id).await?;
    match session.url {
        Some(url) => {
            info!("💳️ Checkout session {} ready for order [{}]", session.id, order.order_id);
            Ok(url)
        },
        None => {
            error!(
                "💳️ Stripe returned session {} without a redirect URL. Order [{}] is still pending and the checkout \
                 can be retried.",
                session.id, order.order_id
            );
            Err(ServerError::PaymentProviderError("The provider did not return a redirect URL".to_string()))
        },
    }
}
