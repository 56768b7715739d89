//! Outbound Notifications
//!
//! Features:
//! - Telegram alert with HTML formatting and score emoji
//! - SendGrid confirmation and admin emails
//! - Airtable CRM row insert
//! - Workflow webhook POST with a short timeout
//! - Fire-and-forget fan-out over all configured channels

pub mod airtable;
pub mod email;
pub mod fanout;
pub mod telegram;
pub mod webhook;

pub use airtable::AirtableClient;
pub use email::EmailClient;
pub use fanout::NotificationFanout;
pub use telegram::TelegramClient;
pub use webhook::WebhookClient;

use thiserror::Error;

/// Notification errors. Always logged, never propagated to visitors.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Request error: {0}")]
    Request(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Channel not configured: {0}")]
    NotConfigured(&'static str),
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Request(err.to_string())
    }
}
