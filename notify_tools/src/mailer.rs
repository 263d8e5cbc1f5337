use std::sync::Arc;

use log::*;
use reqwest::Client;
use serde::Serialize;
use serde_json::json;

use crate::{config::MailerConfig, error::NotifyError};

/// One outbound email. Both a plain-text and an HTML rendering are always supplied; the relay
/// picks whichever the recipient's client prefers.
#[derive(Debug, Clone, Serialize)]
pub struct EmailOptions {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[derive(Clone)]
pub struct MailerApi {
    config: MailerConfig,
    client: Arc<Client>,
}

impl MailerApi {
    pub fn new(config: MailerConfig) -> Result<Self, NotifyError> {
        let client = Client::builder().build().map_err(|e| NotifyError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Sends one mail through the relay's JSON API.
    pub async fn send_mail(&self, mail: &EmailOptions) -> Result<(), NotifyError> {
        let url = format!("{}/v3/mail/send", self.config.api_url);
        let body = json!({
            "personalizations": [{ "to": [{ "email": mail.to }] }],
            "from": { "email": self.config.from_address },
            "subject": mail.subject,
            "content": [
                { "type": "text/plain", "value": mail.text },
                { "type": "text/html", "value": mail.html }
            ]
        });
        trace!("Sending mail to {}: {}", mail.to, mail.subject);
        let response = self
            .client
            .post(url)
            .bearer_auth(self.config.api_key.reveal())
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            debug!("Mail to {} accepted by the relay", mail.to);
            Ok(())
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| NotifyError::RestResponseError(e.to_string()))?;
            Err(NotifyError::QueryError { status, message })
        }
    }
}
