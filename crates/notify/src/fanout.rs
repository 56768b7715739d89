//! Fan-out of a new lead over every configured channel.
//!
//! Channels run as detached tasks; the HTTP response never waits on
//! them and failures only reach the logs.

use std::sync::Arc;
use tracing::{info, warn};

use leadgate_core::LeadNotification;

use crate::{AirtableClient, EmailClient, TelegramClient, WebhookClient};

/// Holds whichever channels are configured and dispatches to all of
/// them.
#[derive(Clone, Default)]
pub struct NotificationFanout {
    telegram: Option<Arc<TelegramClient>>,
    email: Option<Arc<EmailClient>>,
    airtable: Option<Arc<AirtableClient>>,
    webhook: Option<Arc<WebhookClient>>,
}

impl NotificationFanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_telegram(mut self, client: TelegramClient) -> Self {
        self.telegram = Some(Arc::new(client));
        self
    }

    pub fn with_email(mut self, client: EmailClient) -> Self {
        self.email = Some(Arc::new(client));
        self
    }

    pub fn with_airtable(mut self, client: AirtableClient) -> Self {
        self.airtable = Some(Arc::new(client));
        self
    }

    pub fn with_webhook(mut self, client: WebhookClient) -> Self {
        self.webhook = Some(Arc::new(client));
        self
    }

    pub fn channel_count(&self) -> usize {
        usize::from(self.telegram.is_some())
            + usize::from(self.email.is_some())
            + usize::from(self.airtable.is_some())
            + usize::from(self.webhook.is_some())
    }

    /// Dispatch a lead to every configured channel. Leads without any
    /// contact details are dropped; there is nobody to follow up with.
    pub fn dispatch(&self, lead: LeadNotification) {
        if !lead.has_contact() {
            info!("skipping notification fan-out for lead without contact details");
            return;
        }

        info!(
            score = lead.score,
            source = %lead.source,
            channels = self.channel_count(),
            "dispatching lead notifications"
        );

        if let Some(telegram) = self.telegram.clone() {
            let lead = lead.clone();
            tokio::spawn(async move {
                if let Err(err) = telegram.notify_lead(&lead).await {
                    warn!(%err, "telegram notification failed");
                }
            });
        }

        if let Some(email) = self.email.clone() {
            let lead = lead.clone();
            tokio::spawn(async move {
                if let Err(err) = email.send_confirmation(&lead).await {
                    warn!(%err, "confirmation email failed");
                }
                if let Err(err) = email.send_admin_alert(&lead).await {
                    warn!(%err, "admin alert email failed");
                }
            });
        }

        if let Some(airtable) = self.airtable.clone() {
            let lead = lead.clone();
            tokio::spawn(async move {
                if let Err(err) = airtable.save_lead(&lead).await {
                    warn!(%err, "airtable save failed");
                }
            });
        }

        if let Some(webhook) = self.webhook.clone() {
            tokio::spawn(async move {
                if let Err(err) = webhook.trigger(&lead).await {
                    warn!(%err, "workflow webhook failed");
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn lead_without_contact() -> LeadNotification {
        LeadNotification {
            name: "Ana".into(),
            email: String::new(),
            phone: String::new(),
            message: "hola".into(),
            service: String::new(),
            score: 50,
            source: "chat".into(),
            received_at: Utc::now(),
        }
    }

    #[test]
    fn test_channel_count() {
        let fanout = NotificationFanout::new();
        assert_eq!(fanout.channel_count(), 0);
        let fanout = fanout.with_webhook(WebhookClient::new("http://localhost").unwrap());
        assert_eq!(fanout.channel_count(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_without_contact_spawns_nothing() {
        // Must not panic even with zero channels and no contact.
        NotificationFanout::new().dispatch(lead_without_contact());
    }
}
