//! Workflow webhook trigger.
//!
//! Fires a POST at the configured automation workflow (n8n) so it can
//! schedule follow-ups. Short timeout, never retried; the workflow is
//! best-effort.

use std::time::Duration;
use tracing::debug;

use leadgate_core::LeadNotification;

use crate::NotifyError;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct WebhookClient {
    url: String,
    client: reqwest::Client,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub async fn trigger(&self, lead: &LeadNotification) -> Result<(), NotifyError> {
        if self.url.is_empty() {
            return Err(NotifyError::NotConfigured("webhook"));
        }

        let response = self.client.post(&self.url).json(lead).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!(url = %self.url, "workflow webhook triggered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_unconfigured_client_errors() {
        let client = WebhookClient::new("").unwrap();
        let lead = LeadNotification {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            message: String::new(),
            service: String::new(),
            score: 0,
            source: "chat".into(),
            received_at: Utc::now(),
        };
        assert!(matches!(
            client.trigger(&lead).await,
            Err(NotifyError::NotConfigured("webhook"))
        ));
    }
}
