//! Lead administration endpoints.

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use leadgate_core::{Lead, LeadSource, LeadStatus};
use leadgate_scoring::{analyze, categorize, LeadQualityReport};
use leadgate_store::{DailyStat, DashboardStats, LeadFilter, LeadOrder};

use crate::routes::preview;
use crate::state::AppState;
use crate::ServerError;

#[derive(Debug, Deserialize)]
pub struct LeadListQuery {
    pub status: Option<String>,
    pub source: Option<String>,
    pub min_score: Option<i64>,
    pub max_score: Option<i64>,
    pub order: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct LeadSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub service: String,
    pub score: i64,
    pub category: &'static str,
    pub status: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

impl LeadSummary {
    fn from_lead(lead: &Lead) -> Self {
        Self {
            id: lead.id,
            name: lead.name.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            message: preview(&lead.message, 120),
            service: lead.service.clone(),
            score: lead.score,
            category: categorize(lead.score.clamp(0, 100) as u8).as_str(),
            status: lead.status.clone(),
            source: lead.source.clone(),
            created_at: lead.created_at,
        }
    }
}

fn build_filter(query: &LeadListQuery) -> Result<LeadFilter, ServerError> {
    if let Some(status) = &query.status {
        if LeadStatus::parse(status).is_none() {
            return Err(ServerError::BadRequest(format!("Estado inválido: {status}")));
        }
    }
    if let Some(source) = &query.source {
        if LeadSource::parse(source).is_none() {
            return Err(ServerError::BadRequest(format!("Origen inválido: {source}")));
        }
    }
    let order = match &query.order {
        Some(value) => LeadOrder::parse(value)
            .ok_or_else(|| ServerError::BadRequest(format!("Orden inválido: {value}")))?,
        None => LeadOrder::default(),
    };

    Ok(LeadFilter {
        status: query.status.clone(),
        source: query.source.clone(),
        min_score: query.min_score,
        max_score: query.max_score,
        order,
        limit: query.limit.unwrap_or(50).clamp(1, 200),
        offset: query.offset.unwrap_or(0).max(0),
    })
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<LeadListQuery>,
) -> Result<Json<Vec<LeadSummary>>, ServerError> {
    let filter = build_filter(&query)?;
    let leads = state.store.list_leads(&filter).await?;
    Ok(Json(leads.iter().map(LeadSummary::from_lead).collect()))
}

pub async fn dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, ServerError> {
    Ok(Json(state.store.dashboard_stats().await?))
}

pub async fn quality(
    State(state): State<AppState>,
) -> Result<Json<LeadQualityReport>, ServerError> {
    let scores = state.store.lead_scores().await?;
    Ok(Json(analyze(&scores)))
}

pub async fn daily_stats(
    State(state): State<AppState>,
) -> Result<Json<Vec<DailyStat>>, ServerError> {
    Ok(Json(state.store.daily_stats(28).await?))
}

pub async fn get_lead(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Lead>, ServerError> {
    Ok(Json(state.store.get_lead(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct LeadUpdateRequest {
    pub status: String,
    pub notes: Option<String>,
}

pub async fn update_lead(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<LeadUpdateRequest>,
) -> Result<Json<Lead>, ServerError> {
    let status = LeadStatus::parse(&request.status)
        .ok_or_else(|| ServerError::BadRequest(format!("Estado inválido: {}", request.status)))?;
    let lead = state
        .store
        .update_lead(id, status, request.notes.as_deref())
        .await?;
    Ok(Json(lead))
}

pub async fn delete_lead(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ServerError> {
    state.store.delete_lead(id).await?;
    Ok(Json(serde_json::json!({ "status": "deleted", "id": id })))
}

/// CSV export of leads matching the same filters as the listing.
pub async fn export_csv(
    State(state): State<AppState>,
    Query(query): Query<LeadListQuery>,
) -> Result<(HeaderMap, String), ServerError> {
    let mut filter = build_filter(&query)?;
    filter.limit = query.limit.unwrap_or(1000).clamp(1, 10_000);
    let leads = state.store.list_leads(&filter).await?;

    let mut csv = String::from(
        "id,name,email,phone,service,score,status,source,created_at,message\n",
    );
    for lead in &leads {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{}\n",
            lead.id,
            csv_field(&lead.name),
            csv_field(&lead.email),
            csv_field(&lead.phone),
            csv_field(&lead.service),
            lead.score,
            csv_field(&lead.status),
            csv_field(&lead.source),
            lead.created_at.to_rfc3339(),
            csv_field(&lead.message),
        ));
    }

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"leads.csv\""),
    );
    Ok((headers, csv))
}

/// Quote a CSV field when it needs it.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_build_filter_rejects_unknown_status() {
        let query = LeadListQuery {
            status: Some("bogus".into()),
            source: None,
            min_score: None,
            max_score: None,
            order: None,
            limit: None,
            offset: None,
        };
        assert!(build_filter(&query).is_err());
    }

    #[test]
    fn test_build_filter_clamps_limit() {
        let query = LeadListQuery {
            status: None,
            source: None,
            min_score: None,
            max_score: None,
            order: Some("score".into()),
            limit: Some(9999),
            offset: Some(-5),
        };
        let filter = build_filter(&query).unwrap();
        assert_eq!(filter.limit, 200);
        assert_eq!(filter.offset, 0);
        assert_eq!(filter.order, LeadOrder::ScoreDesc);
    }
}
