//! Inbound webhook verification and classification.
//!
//! Stripe signs every delivery with the endpoint's signing secret: the `Stripe-Signature` header
//! carries a unix timestamp and one or more HMAC-SHA256 signatures over `"{timestamp}.{body}"`.
//! The raw body must be authenticated against that header *before* it is parsed as JSON; a
//! delivery that fails here must not touch any state.
use chrono::Duration;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use wax_common::Secret;

use crate::data_objects::{
    Event, WebhookOutcome, EVENT_ASYNC_PAYMENT_FAILED, EVENT_ASYNC_PAYMENT_SUCCEEDED, EVENT_CHECKOUT_COMPLETED,
    EVENT_PAYMENT_FAILED, EVENT_SESSION_EXPIRED,
};

type HmacSha256 = Hmac<Sha256>;

/// How far a delivery's timestamp may drift from the local clock before it is refused. Bounds
/// the replay window for a captured delivery.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Clone, Error)]
pub enum WebhookError {
    #[error("The signature header is malformed. {0}")]
    MalformedHeader(String),
    #[error("The payload signature does not match the signing secret")]
    SignatureMismatch,
    #[error("The signature timestamp is outside the accepted tolerance")]
    StaleTimestamp,
    #[error("The event payload could not be parsed. {0}")]
    InvalidPayload(String),
    #[error("The event metadata does not carry an order id")]
    MissingOrderId,
}

use WebhookError::*;

#[derive(Debug)]
struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<String>,
}

fn parse_signature_header(header: &str) -> Result<SignatureHeader, WebhookError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();
    for part in header.split(',') {
        let mut kv = part.trim().splitn(2, '=');
        match (kv.next(), kv.next()) {
            (Some("t"), Some(v)) => {
                let t = v.parse::<i64>().map_err(|e| MalformedHeader(format!("bad timestamp: {e}")))?;
                timestamp = Some(t);
            },
            (Some("v1"), Some(v)) => signatures.push(v.to_string()),
            // v0 and any future scheme tags are skipped, per the provider's own guidance
            _ => {},
        }
    }
    let timestamp = timestamp.ok_or_else(|| MalformedHeader("no timestamp".to_string()))?;
    if signatures.is_empty() {
        return Err(MalformedHeader("no v1 signature".to_string()));
    }
    Ok(SignatureHeader { timestamp, signatures })
}

/// Computes the expected signature for a payload at a given timestamp. Exposed so that tests can
/// forge valid deliveries against a known secret.
pub fn sign_payload(secret: &Secret<String>, timestamp: i64, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.reveal().as_bytes()).expect("HMAC can take a key of any size");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    to_hex(&mac.finalize().into_bytes())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Authenticates a delivery and decodes it into an [`Event`].
///
/// Verification order matters: the signature is checked first (against every `v1` candidate, so
/// secret rotation works), then the timestamp tolerance, and only then is the body parsed.
pub fn construct_event(
    secret: &Secret<String>,
    signature_header: &str,
    payload: &[u8],
    tolerance: Duration,
) -> Result<Event, WebhookError> {
    let header = parse_signature_header(signature_header)?;
    let expected = sign_payload(secret, header.timestamp, payload);
    if !header.signatures.iter().any(|candidate| candidate == &expected) {
        return Err(SignatureMismatch);
    }
    let age = chrono::Utc::now().timestamp() - header.timestamp;
    if age.abs() > tolerance.num_seconds() {
        return Err(StaleTimestamp);
    }
    serde_json::from_slice(payload).map_err(|e| InvalidPayload(e.to_string()))
}

/// Maps a verified event onto the internal settlement outcome. Settlement events without a
/// usable order id fail closed; unrecognised event types are acknowledged, never errors.
pub fn classify(event: &Event) -> Result<WebhookOutcome, WebhookError> {
    match event.event_type.as_str() {
        EVENT_CHECKOUT_COMPLETED | EVENT_ASYNC_PAYMENT_SUCCEEDED => {
            let order_id = event.order_id().ok_or(MissingOrderId)?;
            Ok(WebhookOutcome::SettlementSucceeded { order_id: order_id.to_string() })
        },
        EVENT_PAYMENT_FAILED | EVENT_ASYNC_PAYMENT_FAILED | EVENT_SESSION_EXPIRED => {
            let order_id = event.order_id().ok_or(MissingOrderId)?;
            Ok(WebhookOutcome::SettlementFailed { order_id: order_id.to_string() })
        },
        other => Ok(WebhookOutcome::Ignored { event_type: other.to_string() }),
    }
}
