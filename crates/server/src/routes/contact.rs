//! Contact-form endpoint.

use axum::extract::{ConnectInfo, State};
use axum::Json;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tracing::info;

use leadgate_core::{LeadNotification, LeadSource, NewLead};
use leadgate_scoring::{score, ScoringInput};

use crate::state::AppState;
use crate::ServerError;

static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    #[serde(default)]
    pub service: String,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_score: Option<u8>,
}

fn validate(request: &ContactRequest) -> Result<(), ServerError> {
    let name = request.name.trim();
    let name_chars = name.chars().count();
    if !(2..=100).contains(&name_chars) {
        return Err(ServerError::BadRequest(
            "El nombre debe tener entre 2 y 100 caracteres".into(),
        ));
    }
    if !name.chars().all(|c| c.is_alphabetic() || c.is_whitespace() || c == '\'' || c == '-') {
        return Err(ServerError::BadRequest(
            "El nombre solo puede contener letras".into(),
        ));
    }

    if !EMAIL_SHAPE.is_match(request.email.trim()) {
        return Err(ServerError::BadRequest("Email inválido".into()));
    }

    let digits = request.phone.chars().filter(char::is_ascii_digit).count();
    if digits < 8 {
        return Err(ServerError::BadRequest(
            "El teléfono debe tener al menos 8 dígitos".into(),
        ));
    }

    let message_chars = request.message.trim().chars().count();
    if !(10..=2000).contains(&message_chars) {
        return Err(ServerError::BadRequest(
            "El mensaje debe tener entre 10 y 2000 caracteres".into(),
        ));
    }

    Ok(())
}

/// Handle a landing-form submission: validate, dedupe by email, score,
/// persist and fan out notifications in the background.
pub async fn submit(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<ContactRequest>,
) -> Result<Json<ContactResponse>, ServerError> {
    if !state.rate_limiter.check(addr.ip()) {
        return Err(ServerError::RateLimited);
    }

    validate(&request)?;

    let email = request.email.trim().to_string();
    if let Some(existing) = state.store.find_lead_by_email(&email).await? {
        info!(lead_id = existing.id, "duplicate contact submission");
        return Ok(Json(ContactResponse {
            status: "warning",
            message: "Ya recibimos tu consulta. Nos comunicamos contigo a la brevedad.".into(),
            lead_id: Some(existing.id),
            lead_score: None,
        }));
    }

    // A completed form is a direct contact with explicit intent.
    let lead_score = score(
        &ScoringInput::new(request.message.trim()).with_signals(true, true),
    );

    let new_lead = NewLead {
        name: request.name.trim().to_string(),
        email,
        phone: request.phone.trim().to_string(),
        message: request.message.trim().to_string(),
        service: request.service.trim().to_string(),
        score: lead_score,
        source: LeadSource::LandingForm,
    };
    let lead = state.store.insert_lead(&new_lead).await?;
    info!(id = lead.id, score = lead.score, "form lead captured");

    state.fanout.dispatch(LeadNotification {
        name: lead.name.clone(),
        email: lead.email.clone(),
        phone: lead.phone.clone(),
        message: lead.message.clone(),
        service: lead.service.clone(),
        score: lead_score,
        source: lead.source.clone(),
        received_at: Utc::now(),
    });

    Ok(Json(ContactResponse {
        status: "success",
        message: "Consulta recibida. En menos de 24 horas nos comunicamos contigo.".into(),
        lead_id: Some(lead.id),
        lead_score: Some(lead_score),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> ContactRequest {
        ContactRequest {
            name: "Ana García".into(),
            email: "ana@test.com".into(),
            phone: "+34 612 345 678".into(),
            message: "Necesito automatizar la facturación de mi empresa".into(),
            service: "Automatización".into(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate(&valid_request()).is_ok());
    }

    #[test]
    fn test_short_name_rejected() {
        let mut request = valid_request();
        request.name = "A".into();
        assert!(validate(&request).is_err());
    }

    #[test]
    fn test_name_with_digits_rejected() {
        let mut request = valid_request();
        request.name = "Ana123".into();
        assert!(validate(&request).is_err());
    }

    #[test]
    fn test_bad_email_rejected() {
        for email in ["not-an-email", "a@b", "@test.com", "ana@test."] {
            let mut request = valid_request();
            request.email = email.into();
            assert!(validate(&request).is_err(), "accepted {email}");
        }
    }

    #[test]
    fn test_short_phone_rejected() {
        let mut request = valid_request();
        request.phone = "12345".into();
        assert!(validate(&request).is_err());
    }

    #[test]
    fn test_short_message_rejected() {
        let mut request = valid_request();
        request.message = "hola".into();
        assert!(validate(&request).is_err());
    }
}
