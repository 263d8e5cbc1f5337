//! Notification listener wiring.
//!
//! Builds the event-hook registry that fans settlement announcements out to the owner's inbox
//! and the store's chat channel. Three listeners are registered: settled → owner email,
//! settled → chat broadcast, failed → owner email. Each listener re-fetches the order (and the
//! owner's contact details) from the store when its event arrives; the event payload itself
//! only carries the order id.
//!
//! Listener failures are logged and swallowed; they can affect neither order state nor the
//! webhook response that triggered them.
use std::{future::Future, pin::Pin};

use log::*;
use notify_tools::{EmailOptions, MailerApi, NotifyError, TelegramApi};
use thiserror::Error;
use waxline_engine::{
    db_types::{Order, OrderId},
    events::{EventHandlers, EventHooks},
    traits::{CustomerDirectory, OrderDatabase, OrderStoreError},
    SqliteDatabase,
};

use crate::{config::NotificationsConfig, errors::ServerError};

pub const NOTIFICATION_EVENT_BUFFER_SIZE: usize = 25;

type ListenerFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

#[derive(Debug, Error)]
enum NotificationError {
    #[error(transparent)]
    Store(#[from] OrderStoreError),
    #[error(transparent)]
    Delivery(#[from] NotifyError),
    #[error("Order {0} is not in the store")]
    UnknownOrder(OrderId),
    #[error("No contact details on record for customer {0}")]
    UnknownCustomer(String),
}

/// Builds the listener registry for settlement events.
///
/// Called once at startup; the returned handlers are started before the server begins accepting
/// requests, and only their producer handles travel further.
pub fn create_notification_event_handlers(
    config: &NotificationsConfig,
    db: SqliteDatabase,
) -> Result<EventHandlers, ServerError> {
    let mut hooks = EventHooks::default();
    if !config.enabled {
        info!("📬️ Notifications are disabled. Settlement events will not fan out anywhere.");
        return Ok(EventHandlers::new(NOTIFICATION_EVENT_BUFFER_SIZE, hooks));
    }
    let mailer = MailerApi::new(config.mailer.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let telegram = TelegramApi::new(config.telegram.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;

    // --- Settled: email the order's owner ---
    let settled_mailer = mailer.clone();
    let settled_db = db.clone();
    hooks.on_order_settled(move |ev| -> ListenerFuture {
        let mailer = settled_mailer.clone();
        let db = settled_db.clone();
        Box::pin(async move {
            if let Err(e) = send_settlement_email(&db, &mailer, &ev.order_id, true).await {
                error!("📬️ Could not send settlement email for order [{}]. {e}", ev.order_id);
            }
        })
    });

    // --- Settled: broadcast to the store chat ---
    let broadcast_db = db.clone();
    hooks.on_order_settled(move |ev| -> ListenerFuture {
        let telegram = telegram.clone();
        let db = broadcast_db.clone();
        Box::pin(async move {
            if let Err(e) = broadcast_settlement(&db, &telegram, &ev.order_id).await {
                error!("📬️ Could not broadcast settlement of order [{}]. {e}", ev.order_id);
            }
        })
    });

    // --- Settlement failed: email the order's owner ---
    hooks.on_settlement_failed(move |ev| -> ListenerFuture {
        let mailer = mailer.clone();
        let db = db.clone();
        Box::pin(async move {
            if let Err(e) = send_settlement_email(&db, &mailer, &ev.order_id, false).await {
                error!("📬️ Could not send settlement-failure email for order [{}]. {e}", ev.order_id);
            }
        })
    });

    Ok(EventHandlers::new(NOTIFICATION_EVENT_BUFFER_SIZE, hooks))
}

async fn load_order(db: &SqliteDatabase, order_id: &OrderId) -> Result<Order, NotificationError> {
    db.fetch_order_by_id(order_id).await?.ok_or_else(|| NotificationError::UnknownOrder(order_id.clone()))
}

async fn send_settlement_email(
    db: &SqliteDatabase,
    mailer: &MailerApi,
    order_id: &OrderId,
    succeeded: bool,
) -> Result<(), NotificationError> {
    let order = load_order(db, order_id).await?;
    let contact = db
        .fetch_contact(&order.customer_id)
        .await?
        .ok_or_else(|| NotificationError::UnknownCustomer(order.customer_id.clone()))?;
    let (subject, text, html) = if succeeded {
        (
            "Payment received",
            format!("Hi {}, your payment has been successfully processed.", contact.first_name),
            format!("<p>Hi <strong>{}</strong>, your payment has been successfully processed.</p>", contact.first_name),
        )
    } else {
        (
            "Payment failed",
            format!("Hi {}, unfortunately, your payment could not be processed. Please try again.", contact.first_name),
            format!(
                "<p>Hi <strong>{}</strong>, unfortunately, your payment could not be processed. Please try \
                 again.</p>",
                contact.first_name
            ),
        )
    };
    mailer.send_mail(&EmailOptions { to: contact.email, subject: subject.to_string(), text, html }).await?;
    debug!("📬️ Settlement email for order [{order_id}] handed to the relay");
    Ok(())
}

async fn broadcast_settlement(
    db: &SqliteDatabase,
    telegram: &TelegramApi,
    order_id: &OrderId,
) -> Result<(), NotificationError> {
    let order = load_order(db, order_id).await?;
    let message = format!(
        "<b>Order settled!</b>\n\n<b>Order:</b> {}\n<b>Items:</b> {}\n<b>Total:</b> {} {}",
        order.order_id,
        order.items.len(),
        order.total_amount,
        order.currency
    );
    telegram.send_message(&message).await?;
    debug!("📬️ Settlement of order [{order_id}] broadcast to the store chat");
    Ok(())
}
