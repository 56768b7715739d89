//! Telegram admin alerts.

use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use leadgate_core::LeadNotification;

use crate::NotifyError;

/// Telegram Bot API client for the admin channel.
#[derive(Clone)]
pub struct TelegramClient {
    token: String,
    chat_id: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

impl TelegramClient {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            token: token.into(),
            chat_id: chat_id.into(),
            client,
        })
    }

    /// Send an HTML-formatted message to the admin chat.
    pub async fn send_message(&self, text: &str) -> Result<(), NotifyError> {
        if self.token.is_empty() || self.chat_id.is_empty() {
            return Err(NotifyError::NotConfigured("telegram"));
        }
        if text.is_empty() {
            return Ok(());
        }

        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!("telegram message sent");
        Ok(())
    }

    /// Announce a new lead with score emoji and quick-reply links.
    pub async fn notify_lead(&self, lead: &LeadNotification) -> Result<(), NotifyError> {
        let text = format_lead_message(lead);
        self.send_message(&text).await
    }
}

/// Escape the characters Telegram's HTML parse mode interprets.
fn escape_html(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

fn score_emoji(score: u8) -> &'static str {
    if score >= 80 {
        "🔥"
    } else if score >= 60 {
        "⭐"
    } else {
        "⚡"
    }
}

fn format_lead_message(lead: &LeadNotification) -> String {
    let name = {
        let n = escape_html(lead.name.trim());
        if n.is_empty() {
            "Cliente Chatbot".to_string()
        } else {
            n
        }
    };
    let email = escape_html(lead.email.trim());
    let service = if lead.service.is_empty() {
        "No especificado".to_string()
    } else {
        escape_html(&lead.service)
    };
    let wa_number: String = lead
        .phone
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();

    format!(
        "<b>🚀 NUEVO LEAD</b>\n\n\
         <b>👤 Nombre:</b> <code>{name}</code>\n\
         <b>📧 Email:</b> <code>{email}</code>\n\
         <b>📱 WhatsApp:</b> <a href=\"https://wa.me/{wa_number}\">{phone}</a>\n\n\
         <b>🎯 Servicio:</b> {service}\n\
         <b>📝 Mensaje:</b>\n<code>{message}</code>\n\n\
         <b>{emoji} Score:</b> <code>{score}/100</code>\n\
         <b>📍 Origen:</b> {source}",
        phone = escape_html(&lead.phone),
        message = escape_html(truncate_chars(&lead.message, 150)),
        emoji = score_emoji(lead.score),
        score = lead.score,
        source = escape_html(&lead.source),
    )
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_lead() -> LeadNotification {
        LeadNotification {
            name: "Ana <García>".into(),
            email: "ana@test.com".into(),
            phone: "+34 612 345 678".into(),
            message: "Necesito automatizar facturas".into(),
            service: "Automatización".into(),
            score: 85,
            source: "landing_form".into(),
            received_at: Utc::now(),
        }
    }

    #[test]
    fn test_html_is_escaped() {
        let text = format_lead_message(&sample_lead());
        assert!(text.contains("Ana &lt;García&gt;"));
        assert!(!text.contains("<García>"));
    }

    #[test]
    fn test_whatsapp_link_strips_formatting() {
        let text = format_lead_message(&sample_lead());
        assert!(text.contains("https://wa.me/34612345678"));
    }

    #[test]
    fn test_score_emoji_bands() {
        assert_eq!(score_emoji(95), "🔥");
        assert_eq!(score_emoji(80), "🔥");
        assert_eq!(score_emoji(70), "⭐");
        assert_eq!(score_emoji(30), "⚡");
    }

    #[test]
    fn test_empty_name_gets_placeholder() {
        let mut lead = sample_lead();
        lead.name = "  ".into();
        let text = format_lead_message(&lead);
        assert!(text.contains("Cliente Chatbot"));
    }
}
