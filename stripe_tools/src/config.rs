use log::*;
use wax_common::Secret;

const DEFAULT_STRIPE_API_URL: &str = "https://api.stripe.com";

#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Base URL for the Stripe REST API. Only overridden when pointing at a local mock.
    pub api_url: String,
    /// The account's secret API key (`sk_...`), used as a bearer token on outbound calls.
    pub secret_key: Secret<String>,
    /// The webhook endpoint's signing secret (`whsec_...`), shared out-of-band and used to
    /// authenticate every inbound delivery.
    pub webhook_secret: Secret<String>,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_STRIPE_API_URL.to_string(),
            secret_key: Secret::default(),
            webhook_secret: Secret::default(),
        }
    }
}

impl StripeConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("WAXLINE_STRIPE_API_URL").unwrap_or_else(|_| DEFAULT_STRIPE_API_URL.to_string());
        let secret_key = Secret::new(std::env::var("WAXLINE_STRIPE_SECRET_KEY").unwrap_or_else(|_| {
            error!("WAXLINE_STRIPE_SECRET_KEY is not set. Checkout session calls will be rejected by Stripe.");
            String::default()
        }));
        let webhook_secret = Secret::new(std::env::var("WAXLINE_STRIPE_WEBHOOK_SECRET").unwrap_or_else(|_| {
            error!("WAXLINE_STRIPE_WEBHOOK_SECRET is not set. Webhook deliveries will fail verification.");
            String::default()
        }));
        Self { api_url, secret_key, webhook_secret }
    }
}
