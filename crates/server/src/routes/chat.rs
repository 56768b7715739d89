//! Chatbot endpoint and session browsing.

use axum::extract::{ConnectInfo, Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tracing::info;

use leadgate_core::{ChatSession, ContactRecord, LeadNotification, LeadSource, NewLead};
use leadgate_llm::Message;
use leadgate_scoring::{score, ScoringInput};

use crate::routes::preview;
use crate::state::AppState;
use crate::ServerError;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub status: &'static str,
    pub response: String,
    pub session_id: String,
    pub lead_score: u8,
    pub is_lead: bool,
    pub timestamp: DateTime<Utc>,
}

/// One chat turn: reply, score, extract, persist, and notify when the
/// conversation has yielded a complete contact.
pub async fn chat(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ServerError> {
    if !state.rate_limiter.check(addr.ip()) {
        return Err(ServerError::RateLimited);
    }

    let message = request.message.trim();
    if message.is_empty() {
        return Err(ServerError::BadRequest("El mensaje no puede estar vacío".into()));
    }
    let max_len = state.settings.chat.max_message_len;
    if message.chars().count() > max_len {
        return Err(ServerError::BadRequest(format!(
            "El mensaje no puede superar {max_len} caracteres"
        )));
    }

    let session_id = request
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(ChatSession::new_id);
    state.store.get_or_create_session(&session_id).await?;

    let history_limit = state.settings.chat.history_limit as i64;
    let history_rows = state.store.session_history(&session_id, history_limit).await?;
    let mut llm_history = Vec::with_capacity(history_rows.len() * 2);
    for row in &history_rows {
        llm_history.push(Message::user(row.user_message.clone()));
        llm_history.push(Message::assistant(row.bot_response.clone()));
    }

    let reply = state.agent.respond(message, &llm_history).await;

    // Signals and extraction look at the whole conversation, not just
    // this turn.
    let prior_text = state.store.session_user_text(&session_id).await?;
    let combined = if prior_text.is_empty() {
        message.to_string()
    } else {
        format!("{prior_text} {message}")
    };

    let signals = state.detector.detect(&combined);
    let lead_score = score(
        &ScoringInput::new(message)
            .with_signals(signals.has_contact, signals.has_intent)
            .with_history_len(history_rows.len()),
    );

    state
        .store
        .append_message(&session_id, message, &reply, lead_score)
        .await?;

    let record = state.extractor.extract(&combined);
    let is_lead = record.is_complete();
    if is_lead {
        capture_chat_lead(&state, &record, &combined, lead_score).await?;
    }

    Ok(Json(ChatResponse {
        status: "success",
        response: reply,
        session_id,
        lead_score,
        is_lead,
        timestamp: Utc::now(),
    }))
}

/// Persist a lead extracted from chat and fan out notifications,
/// unless the email already produced one.
async fn capture_chat_lead(
    state: &AppState,
    record: &ContactRecord,
    conversation: &str,
    lead_score: u8,
) -> Result<(), ServerError> {
    if state.store.find_lead_by_email(&record.email).await?.is_some() {
        info!(email = %record.email, "chat lead already captured, skipping");
        return Ok(());
    }

    let message = if record.problem.is_empty() {
        preview(conversation, 500)
    } else {
        record.problem.clone()
    };
    let new_lead = NewLead {
        name: record.name.clone(),
        email: record.email.clone(),
        phone: record.phone.clone(),
        message,
        service: record.service.clone(),
        score: lead_score,
        source: LeadSource::Chat,
    };
    let lead = state.store.insert_lead(&new_lead).await?;
    info!(id = lead.id, score = lead.score, "chat lead captured");

    state.fanout.dispatch(LeadNotification {
        name: lead.name,
        email: lead.email,
        phone: lead.phone,
        message: lead.message,
        service: lead.service,
        score: lead_score,
        source: lead.source,
        received_at: lead.created_at,
    });
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct SessionListQuery {
    pub limit: Option<i64>,
}

pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<SessionListQuery>,
) -> Result<Json<Vec<ChatSession>>, ServerError> {
    let limit = query.limit.unwrap_or(50).clamp(1, 100);
    let sessions = state.store.list_sessions(limit).await?;
    Ok(Json(sessions))
}

#[derive(Debug, Serialize)]
pub struct SessionMessageView {
    pub user_message: String,
    pub bot_response: String,
    pub lead_score: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SessionDetail {
    pub session_id: String,
    pub message_count: usize,
    pub messages: Vec<SessionMessageView>,
}

pub async fn session_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionDetail>, ServerError> {
    let messages = state.store.session_history(&id, 200).await?;
    if messages.is_empty() {
        return Err(ServerError::NotFound(format!("session {id}")));
    }

    let views = messages
        .iter()
        .map(|m| SessionMessageView {
            user_message: preview(&m.user_message, 100),
            bot_response: preview(&m.bot_response, 100),
            lead_score: m.lead_score,
            created_at: m.created_at,
        })
        .collect::<Vec<_>>();

    Ok(Json(SessionDetail {
        session_id: id,
        message_count: views.len(),
        messages: views,
    }))
}
