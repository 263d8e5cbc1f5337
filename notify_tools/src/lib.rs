//! Outbound notification clients for the Waxline order backend.
//!
//! Two thin clients: a mail relay ([`MailerApi`], SendGrid wire format) and a chat
//! broadcast ([`TelegramApi`]). They sit on the far side of the event bus, so nothing here may
//! ever matter to order state. Callers log delivery failures and move on.
mod config;
mod error;
mod mailer;
mod telegram;

pub use config::{MailerConfig, TelegramConfig};
pub use error::NotifyError;
pub use mailer::{EmailOptions, MailerApi};
pub use telegram::TelegramApi;
