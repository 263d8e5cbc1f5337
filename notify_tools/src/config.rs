use log::*;
use wax_common::Secret;

const DEFAULT_MAILER_API_URL: &str = "https://api.sendgrid.com";
const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub api_url: String,
    pub api_key: Secret<String>,
    /// The address settlement emails are sent from.
    pub from_address: String,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_MAILER_API_URL.to_string(),
            api_key: Secret::default(),
            from_address: String::default(),
        }
    }
}

impl MailerConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("WAXLINE_MAILER_API_URL").unwrap_or_else(|_| DEFAULT_MAILER_API_URL.to_string());
        let api_key = Secret::new(std::env::var("WAXLINE_MAILER_API_KEY").unwrap_or_else(|_| {
            warn!("WAXLINE_MAILER_API_KEY is not set. Settlement emails will fail to send.");
            String::default()
        }));
        let from_address = std::env::var("WAXLINE_MAILER_FROM").unwrap_or_else(|_| {
            warn!("WAXLINE_MAILER_FROM is not set. Settlement emails will fail to send.");
            String::default()
        });
        Self { api_url, api_key, from_address }
    }
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub api_url: String,
    pub bot_token: Secret<String>,
    /// The chat every broadcast goes to.
    pub chat_id: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self { api_url: DEFAULT_TELEGRAM_API_URL.to_string(), bot_token: Secret::default(), chat_id: String::default() }
    }
}

impl TelegramConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url =
            std::env::var("WAXLINE_TELEGRAM_API_URL").unwrap_or_else(|_| DEFAULT_TELEGRAM_API_URL.to_string());
        let bot_token = Secret::new(std::env::var("WAXLINE_TELEGRAM_BOT_TOKEN").unwrap_or_else(|_| {
            warn!("WAXLINE_TELEGRAM_BOT_TOKEN is not set. Chat broadcasts will fail to send.");
            String::default()
        }));
        let chat_id = std::env::var("WAXLINE_TELEGRAM_CHAT_ID").unwrap_or_else(|_| {
            warn!("WAXLINE_TELEGRAM_CHAT_ID is not set. Chat broadcasts will fail to send.");
            String::default()
        });
        Self { api_url, bot_token, chat_id }
    }
}
