//----------------------------------------------   Webhook intake  ----------------------------------------------------
//
// One inbound provider delivery becomes at most one settlement application. The pipeline is
// verify → classify → apply → announce, and each stage returns a tagged result: a delivery that
// fails verification is rejected before the body is even parsed, an unrecognised event type is
// an acknowledged no-op rather than an error, and the announce step rides inside the engine's
// mark_paid/mark_failed so it can never run before the status write is durable.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Duration;
use log::*;
use stripe_tools::{
    webhook::{self, WebhookError, DEFAULT_TOLERANCE_SECS},
    StripeConfig, WebhookOutcome,
};
use waxline_engine::{db_types::OrderId, traits::OrderDatabase, OrderFlowApi};

use crate::{data_objects::WebhookAck, errors::ServerError, route};

route!(stripe_webhook => Post "/webhook" impl OrderDatabase);
pub async fn stripe_webhook<B>(
    req: HttpRequest,
    body: web::Bytes,
    api: web::Data<OrderFlowApi<B>>,
    config: web::Data<StripeConfig>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderDatabase,
{
    trace!("🪝️ Received webhook request: {}", req.uri());
    let signature = req.headers().get("Stripe-Signature").and_then(|v| v.to_str().ok()).ok_or_else(|| {
        warn!("🪝️🔐️ Webhook delivery carried no signature header. Denying.");
        ServerError::WebhookAuthenticationFailed("No signature header found".to_string())
    })?;

    // Authenticity gate: nothing below runs, and no state is touched, unless the raw body
    // verifies against the shared signing secret.
    let event =
        match webhook::construct_event(&config.webhook_secret, signature, &body, Duration::seconds(DEFAULT_TOLERANCE_SECS)) {
            Ok(event) => event,
            Err(
                e @ (WebhookError::MalformedHeader(_) | WebhookError::SignatureMismatch | WebhookError::StaleTimestamp),
            ) => {
                // Either the signing secret is misconfigured, or someone is probing the
                // endpoint. Kept apart from ordinary client errors in the logs.
                warn!("🪝️🔐️ Webhook delivery failed verification: {e}");
                return Err(e.into());
            },
            Err(e) => {
                warn!("🪝️ Verified webhook delivery could not be decoded: {e}");
                return Err(e.into());
            },
        };

    let outcome = webhook::classify(&event).map_err(|e| {
        // A settlement event without a usable order id is either a provider integration bug or
        // a forged payload that verified for an unrelated endpoint. Fail closed.
        warn!("🪝️ Webhook event {} rejected: {e}", event.id.as_deref().unwrap_or("<unidentified>"));
        ServerError::from(e)
    })?;

    match outcome {
        WebhookOutcome::SettlementSucceeded { order_id } => {
            let order_id = OrderId(order_id);
            api.mark_paid(&order_id).await?;
            info!("🪝️ Settlement succeeded for order [{order_id}]");
        },
        WebhookOutcome::SettlementFailed { order_id } => {
            let order_id = OrderId(order_id);
            api.mark_failed(&order_id).await?;
            info!("🪝️ Settlement failed for order [{order_id}]");
        },
        WebhookOutcome::Ignored { event_type } => {
            debug!("🪝️ Unhandled event type {event_type}. Acknowledging without action.");
        },
    }

    // Any 2xx stops provider-side redelivery. Errors are the only path that provokes a retry,
    // and re-processing a redelivered event is safe by the last-write-wins policy.
    Ok(HttpResponse::Ok().json(WebhookAck::received()))
}
