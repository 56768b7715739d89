//! Airtable CRM row insert.

use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use leadgate_core::LeadNotification;

use crate::NotifyError;

/// Inserts one row per lead into a configured Airtable base/table.
#[derive(Clone)]
pub struct AirtableClient {
    api_key: String,
    base_id: String,
    table_name: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct CreateRecordRequest {
    fields: RecordFields,
}

#[derive(Debug, Serialize)]
struct RecordFields {
    #[serde(rename = "Nombre")]
    name: String,
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "Telefono")]
    phone: String,
    #[serde(rename = "Mensaje")]
    message: String,
    #[serde(rename = "Servicio")]
    service: String,
    #[serde(rename = "Score")]
    score: u8,
    #[serde(rename = "Origen")]
    source: String,
    #[serde(rename = "Fecha")]
    received_at: String,
}

impl AirtableClient {
    pub fn new(
        api_key: impl Into<String>,
        base_id: impl Into<String>,
        table_name: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            api_key: api_key.into(),
            base_id: base_id.into(),
            table_name: table_name.into(),
            client,
        })
    }

    pub async fn save_lead(&self, lead: &LeadNotification) -> Result<(), NotifyError> {
        if self.api_key.is_empty() || self.base_id.is_empty() {
            return Err(NotifyError::NotConfigured("airtable"));
        }

        let url = format!(
            "https://api.airtable.com/v0/{}/{}",
            self.base_id, self.table_name
        );
        let request = CreateRecordRequest {
            fields: RecordFields {
                name: lead.name.clone(),
                email: lead.email.clone(),
                phone: lead.phone.clone(),
                message: lead.message.clone(),
                service: lead.service.clone(),
                score: lead.score,
                source: lead.source.clone(),
                received_at: lead.received_at.to_rfc3339(),
            },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!(table = %self.table_name, "lead saved to airtable");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_client_errors() {
        let client = AirtableClient::new("", "", "Leads").unwrap();
        let lead = LeadNotification {
            name: "Ana".into(),
            email: "ana@test.com".into(),
            phone: String::new(),
            message: String::new(),
            service: String::new(),
            score: 50,
            source: "chat".into(),
            received_at: chrono::Utc::now(),
        };
        let result = client.save_lead(&lead).await;
        assert!(matches!(result, Err(NotifyError::NotConfigured("airtable"))));
    }
}
