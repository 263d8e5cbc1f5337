use std::sync::Arc;

use log::*;
use reqwest::Client;
use serde_json::json;

use crate::{config::TelegramConfig, error::NotifyError};

#[derive(Clone)]
pub struct TelegramApi {
    config: TelegramConfig,
    client: Arc<Client>,
}

impl TelegramApi {
    pub fn new(config: TelegramConfig) -> Result<Self, NotifyError> {
        let client = Client::builder().build().map_err(|e| NotifyError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Broadcasts one HTML-formatted message to the configured chat.
    pub async fn send_message(&self, message: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.config.api_url, self.config.bot_token.reveal());
        let body = json!({
            "chat_id": self.config.chat_id,
            "text": message,
            "parse_mode": "HTML",
        });
        trace!("Broadcasting message to chat {}", self.config.chat_id);
        let response =
            self.client.post(url).json(&body).send().await.map_err(|e| NotifyError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            debug!("Broadcast accepted by Telegram");
            Ok(())
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| NotifyError::RestResponseError(e.to_string()))?;
            Err(NotifyError::QueryError { status, message })
        }
    }
}
