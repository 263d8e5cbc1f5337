use std::env;

use log::*;
use notify_tools::{MailerConfig, TelegramConfig};
use stripe_tools::StripeConfig;
use wax_common::helpers::parse_boolean_flag;

const DEFAULT_WAXLINE_HOST: &str = "127.0.0.1";
const DEFAULT_WAXLINE_PORT: u16 = 8560;
const DEFAULT_CHECKOUT_RETURN_URL: &str = "http://localhost:3000/orders";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Stripe credentials: the API key for outbound calls and the signing secret that inbound
    /// webhook deliveries are verified against.
    pub stripe: StripeConfig,
    pub checkout: CheckoutUrls,
    pub notifications: NotificationsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_WAXLINE_HOST.to_string(),
            port: DEFAULT_WAXLINE_PORT,
            database_url: String::default(),
            stripe: StripeConfig::default(),
            checkout: CheckoutUrls::default(),
            notifications: NotificationsConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("WAXLINE_HOST").ok().unwrap_or_else(|| DEFAULT_WAXLINE_HOST.into());
        let port = env::var("WAXLINE_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for WAXLINE_PORT. {e} Using the default, {DEFAULT_WAXLINE_PORT}, \
                         instead."
                    );
                    DEFAULT_WAXLINE_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_WAXLINE_PORT);
        let database_url = env::var("WAXLINE_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ WAXLINE_DATABASE_URL is not set. Please set it to the URL for the order database.");
            String::default()
        });
        let stripe = StripeConfig::new_from_env_or_default();
        let checkout = CheckoutUrls::from_env_or_default();
        let notifications = NotificationsConfig::from_env_or_default();
        Self { host, port, database_url, stripe, checkout, notifications }
    }
}

//-------------------------------------------  CheckoutUrls  ----------------------------------------------------------
/// Where the payment provider sends the buyer's browser after a checkout session completes or
/// is abandoned. Both land back on the storefront's orders page by default.
#[derive(Clone, Debug)]
pub struct CheckoutUrls {
    pub success_url: String,
    pub cancel_url: String,
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self {
            success_url: DEFAULT_CHECKOUT_RETURN_URL.to_string(),
            cancel_url: DEFAULT_CHECKOUT_RETURN_URL.to_string(),
        }
    }
}

impl CheckoutUrls {
    pub fn from_env_or_default() -> Self {
        let success_url =
            env::var("WAXLINE_CHECKOUT_SUCCESS_URL").unwrap_or_else(|_| DEFAULT_CHECKOUT_RETURN_URL.to_string());
        let cancel_url =
            env::var("WAXLINE_CHECKOUT_CANCEL_URL").unwrap_or_else(|_| DEFAULT_CHECKOUT_RETURN_URL.to_string());
        Self { success_url, cancel_url }
    }
}

//---------------------------------------  NotificationsConfig  -------------------------------------------------------
#[derive(Clone, Debug, Default)]
pub struct NotificationsConfig {
    /// When false, no notification listeners are registered at all. Settlements still land;
    /// nothing fans out. Useful for test and development environments.
    pub enabled: bool,
    pub mailer: MailerConfig,
    pub telegram: TelegramConfig,
}

impl NotificationsConfig {
    pub fn from_env_or_default() -> Self {
        let enabled = parse_boolean_flag(env::var("WAXLINE_NOTIFICATIONS").ok(), true);
        if !enabled {
            info!("🪛️ WAXLINE_NOTIFICATIONS is off. Settlement emails and chat broadcasts are disabled.");
            return Self { enabled, ..Self::default() };
        }
        Self { enabled, mailer: MailerConfig::new_from_env_or_default(), telegram: TelegramConfig::new_from_env_or_default() }
    }
}
