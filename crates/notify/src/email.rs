//! SendGrid email delivery: visitor confirmation and admin alert.

use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use leadgate_core::LeadNotification;

use crate::NotifyError;

const SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// SendGrid v3 client.
#[derive(Clone)]
pub struct EmailClient {
    api_key: String,
    from_email: String,
    from_name: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct MailRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

impl EmailClient {
    pub fn new(
        api_key: impl Into<String>,
        from_email: impl Into<String>,
        from_name: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            api_key: api_key.into(),
            from_email: from_email.into(),
            from_name: from_name.into(),
            client,
        })
    }

    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), NotifyError> {
        if self.api_key.is_empty() || self.from_email.is_empty() {
            return Err(NotifyError::NotConfigured("sendgrid"));
        }

        let request = MailRequest {
            personalizations: vec![Personalization {
                to: vec![Address { email: to, name: None }],
            }],
            from: Address {
                email: &self.from_email,
                name: Some(&self.from_name),
            },
            subject,
            content: vec![Content {
                content_type: "text/html",
                value: html,
            }],
        };

        let response = self
            .client
            .post(SENDGRID_URL)
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

        debug!(to, subject, "email sent");
        Ok(())
    }

    /// Confirmation to the visitor: consultation acknowledged, reply
    /// within 24 hours.
    pub async fn send_confirmation(&self, lead: &LeadNotification) -> Result<(), NotifyError> {
        if lead.email.is_empty() {
            return Ok(());
        }
        let html = confirmation_body(lead);
        self.send(&lead.email, "Recibimos tu consulta", &html).await
    }

    /// Alert to the admin inbox with the full lead details.
    pub async fn send_admin_alert(&self, lead: &LeadNotification) -> Result<(), NotifyError> {
        let subject = format!("🚀 NUEVO LEAD: {}", lead.name);
        let html = admin_body(lead);
        self.send(&self.from_email, &subject, &html).await
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn confirmation_body(lead: &LeadNotification) -> String {
    format!(
        "<h2>¡Gracias por tu consulta, {name}!</h2>\
         <p>Recibimos tu mensaje y en menos de 24 horas nos comunicamos \
         contigo para coordinar la consulta.</p>\
         <p><b>Tu consulta:</b></p>\
         <blockquote>{message}</blockquote>\
         <p>Saludos,<br>El equipo de automatización</p>",
        name = escape_html(&lead.name),
        message = escape_html(&lead.message),
    )
}

fn admin_body(lead: &LeadNotification) -> String {
    format!(
        "<h2>Nuevo lead ({source})</h2>\
         <ul>\
         <li><b>Nombre:</b> {name}</li>\
         <li><b>Email:</b> {email}</li>\
         <li><b>Teléfono:</b> {phone}</li>\
         <li><b>Servicio:</b> {service}</li>\
         <li><b>Score:</b> {score}/100</li>\
         <li><b>Recibido:</b> {received}</li>\
         </ul>\
         <p><b>Mensaje:</b></p>\
         <blockquote>{message}</blockquote>",
        source = escape_html(&lead.source),
        name = escape_html(&lead.name),
        email = escape_html(&lead.email),
        phone = escape_html(&lead.phone),
        service = escape_html(&lead.service),
        score = lead.score,
        received = lead.received_at.format("%Y-%m-%d %H:%M UTC"),
        message = escape_html(&lead.message),
    )
}
