//! Lead persistence and aggregates.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Row};
use std::collections::HashMap;
use tracing::debug;

use leadgate_core::{Lead, LeadStatus, NewLead};

use crate::{Store, StoreError};

/// Sort order for lead listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadOrder {
    #[default]
    NewestFirst,
    ScoreDesc,
    NameAsc,
}

impl LeadOrder {
    fn as_sql(&self) -> &'static str {
        match self {
            LeadOrder::NewestFirst => "created_at DESC",
            LeadOrder::ScoreDesc => "score DESC",
            LeadOrder::NameAsc => "name ASC",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "date" | "newest" => Some(LeadOrder::NewestFirst),
            "score" => Some(LeadOrder::ScoreDesc),
            "name" => Some(LeadOrder::NameAsc),
            _ => None,
        }
    }
}

/// Filter for lead listings. Unset fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    pub status: Option<String>,
    pub source: Option<String>,
    pub min_score: Option<i64>,
    pub max_score: Option<i64>,
    pub order: LeadOrder,
    pub limit: i64,
    pub offset: i64,
}

/// Aggregate counters for the admin dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_leads: i64,
    pub leads_last_24h: i64,
    pub leads_last_7d: i64,
    pub average_score: f64,
    pub by_source: HashMap<String, i64>,
    pub by_status: HashMap<String, i64>,
    /// Share of leads marked converted.
    pub conversion_rate: f64,
    /// Leads scoring 80 or above.
    pub high_value_count: i64,
}

/// One day of lead volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyStat {
    pub date: String,
    pub count: i64,
}

impl Store {
    /// Insert a lead and return the stored row.
    pub async fn insert_lead(&self, lead: &NewLead) -> Result<Lead, StoreError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads
                (name, email, phone, message, service, score, status, source,
                 notes, created_at, last_activity)
            VALUES (?, ?, ?, ?, ?, ?, 'new', ?, '', ?, ?)
            RETURNING *
            "#,
        )
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(&lead.message)
        .bind(&lead.service)
        .bind(i64::from(lead.score))
        .bind(lead.source.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = row.id, score = row.score, source = %row.source, "lead inserted");
        Ok(row)
    }

    pub async fn get_lead(&self, id: i64) -> Result<Lead, StoreError> {
        sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("lead {id}")))
    }

    /// Most recent lead with the given email, if any. Used for the
    /// duplicate-submission check.
    pub async fn find_lead_by_email(&self, email: &str) -> Result<Option<Lead>, StoreError> {
        let row = sqlx::query_as::<_, Lead>(
            "SELECT * FROM leads WHERE email = ? ORDER BY created_at DESC LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// List leads matching `filter`.
    pub async fn list_leads(&self, filter: &LeadFilter) -> Result<Vec<Lead>, StoreError> {
        let mut builder = QueryBuilder::new("SELECT * FROM leads WHERE 1=1");
        if let Some(status) = &filter.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(source) = &filter.source {
            builder.push(" AND source = ").push_bind(source);
        }
        if let Some(min) = filter.min_score {
            builder.push(" AND score >= ").push_bind(min);
        }
        if let Some(max) = filter.max_score {
            builder.push(" AND score <= ").push_bind(max);
        }
        builder.push(" ORDER BY ");
        builder.push(filter.order.as_sql());
        builder.push(" LIMIT ").push_bind(filter.limit.max(1));
        builder.push(" OFFSET ").push_bind(filter.offset.max(0));

        let leads = builder
            .build_query_as::<Lead>()
            .fetch_all(&self.pool)
            .await?;
        Ok(leads)
    }

    /// Update status and optionally notes. The first transition to
    /// contacted stamps `contacted_at`.
    pub async fn update_lead(
        &self,
        id: i64,
        status: LeadStatus,
        notes: Option<&str>,
    ) -> Result<Lead, StoreError> {
        let current = self.get_lead(id).await?;
        let now = Utc::now();
        let contacted_at = match (status, current.contacted_at) {
            (LeadStatus::Contacted, None) => Some(now),
            (_, existing) => existing,
        };
        let notes = notes.unwrap_or(&current.notes);

        let row = sqlx::query_as::<_, Lead>(
            r#"
            UPDATE leads
            SET status = ?, notes = ?, last_activity = ?, contacted_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(status.as_str())
        .bind(notes)
        .bind(now)
        .bind(contacted_at)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete_lead(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("lead {id}")));
        }
        Ok(())
    }

    /// All stored scores, for the batch quality report.
    pub async fn lead_scores(&self) -> Result<Vec<u8>, StoreError> {
        let rows = sqlx::query("SELECT score FROM leads")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(|r| r.get::<i64, _>("score").clamp(0, 100) as u8)
            .collect())
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, StoreError> {
        let now = Utc::now();
        let day_ago = now - Duration::hours(24);
        let week_ago = now - Duration::days(7);

        let totals = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                COALESCE(AVG(score), 0.0) AS avg_score,
                SUM(CASE WHEN created_at >= ? THEN 1 ELSE 0 END) AS last_24h,
                SUM(CASE WHEN created_at >= ? THEN 1 ELSE 0 END) AS last_7d,
                SUM(CASE WHEN status = 'converted' THEN 1 ELSE 0 END) AS converted,
                SUM(CASE WHEN score >= 80 THEN 1 ELSE 0 END) AS high_value
            FROM leads
            "#,
        )
        .bind(day_ago)
        .bind(week_ago)
        .fetch_one(&self.pool)
        .await?;

        let total: i64 = totals.get("total");
        let converted: i64 = totals.try_get("converted").unwrap_or(0);
        let conversion_rate = if total > 0 {
            (converted as f64 / total as f64 * 100.0).round() / 100.0
        } else {
            0.0
        };
        let average_score: f64 = totals.get("avg_score");
        let average_score = (average_score * 10.0).round() / 10.0;

        let mut by_source = HashMap::new();
        for row in sqlx::query("SELECT source, COUNT(*) AS n FROM leads GROUP BY source")
            .fetch_all(&self.pool)
            .await?
        {
            by_source.insert(row.get::<String, _>("source"), row.get::<i64, _>("n"));
        }

        let mut by_status = HashMap::new();
        for row in sqlx::query("SELECT status, COUNT(*) AS n FROM leads GROUP BY status")
            .fetch_all(&self.pool)
            .await?
        {
            by_status.insert(row.get::<String, _>("status"), row.get::<i64, _>("n"));
        }

        Ok(DashboardStats {
            total_leads: total,
            leads_last_24h: totals.try_get("last_24h").unwrap_or(0),
            leads_last_7d: totals.try_get("last_7d").unwrap_or(0),
            average_score,
            by_source,
            by_status,
            conversion_rate,
            high_value_count: totals.try_get("high_value").unwrap_or(0),
        })
    }

    /// Lead volume per day over the trailing window.
    pub async fn daily_stats(&self, days: i64) -> Result<Vec<DailyStat>, StoreError> {
        let cutoff = Utc::now() - Duration::days(days);
        let rows = sqlx::query(
            r#"
            SELECT date(created_at) AS day, COUNT(*) AS n
            FROM leads
            WHERE created_at >= ?
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| DailyStat {
                date: r.get("day"),
                count: r.get("n"),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_store;
    use leadgate_core::LeadSource;

    fn sample(email: &str, score: u8) -> NewLead {
        NewLead {
            name: "Ana García".into(),
            email: email.into(),
            phone: "612345678".into(),
            message: "Necesito automatizar facturas".into(),
            service: "Automatización".into(),
            score,
            source: LeadSource::LandingForm,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = test_store().await;
        let inserted = store.insert_lead(&sample("a@test.com", 70)).await.unwrap();
        assert_eq!(inserted.status, "new");
        assert_eq!(inserted.score, 70);

        let fetched = store.get_lead(inserted.id).await.unwrap();
        assert_eq!(fetched.email, "a@test.com");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = test_store().await;
        assert!(matches!(
            store.get_lead(999).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let store = test_store().await;
        store.insert_lead(&sample("dup@test.com", 50)).await.unwrap();
        assert!(store
            .find_lead_by_email("dup@test.com")
            .await
            .unwrap()
            .is_some());
        assert!(store
            .find_lead_by_email("other@test.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_with_score_filter_and_order() {
        let store = test_store().await;
        store.insert_lead(&sample("low@test.com", 20)).await.unwrap();
        store.insert_lead(&sample("mid@test.com", 60)).await.unwrap();
        store.insert_lead(&sample("high@test.com", 90)).await.unwrap();

        let filter = LeadFilter {
            min_score: Some(50),
            order: LeadOrder::ScoreDesc,
            limit: 10,
            ..LeadFilter::default()
        };
        let leads = store.list_leads(&filter).await.unwrap();
        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].email, "high@test.com");
    }

    #[tokio::test]
    async fn test_update_stamps_contacted_at_once() {
        let store = test_store().await;
        let lead = store.insert_lead(&sample("c@test.com", 70)).await.unwrap();
        assert!(lead.contacted_at.is_none());

        let updated = store
            .update_lead(lead.id, LeadStatus::Contacted, Some("llamado"))
            .await
            .unwrap();
        assert_eq!(updated.status, "contacted");
        assert_eq!(updated.notes, "llamado");
        let first_stamp = updated.contacted_at;
        assert!(first_stamp.is_some());

        // A later transition through contacted keeps the first stamp.
        let again = store
            .update_lead(lead.id, LeadStatus::Contacted, None)
            .await
            .unwrap();
        assert_eq!(again.contacted_at, first_stamp);
        assert_eq!(again.notes, "llamado");
    }

    #[tokio::test]
    async fn test_delete() {
        let store = test_store().await;
        let lead = store.insert_lead(&sample("d@test.com", 40)).await.unwrap();
        store.delete_lead(lead.id).await.unwrap();
        assert!(matches!(
            store.delete_lead(lead.id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_dashboard_stats() {
        let store = test_store().await;
        store.insert_lead(&sample("a@test.com", 90)).await.unwrap();
        let lead = store.insert_lead(&sample("b@test.com", 50)).await.unwrap();
        store
            .update_lead(lead.id, LeadStatus::Converted, None)
            .await
            .unwrap();

        let stats = store.dashboard_stats().await.unwrap();
        assert_eq!(stats.total_leads, 2);
        assert_eq!(stats.leads_last_24h, 2);
        assert_eq!(stats.average_score, 70.0);
        assert_eq!(stats.high_value_count, 1);
        assert_eq!(stats.conversion_rate, 0.5);
        assert_eq!(stats.by_status.get("converted"), Some(&1));
        assert_eq!(stats.by_source.get("landing_form"), Some(&2));
    }

    #[tokio::test]
    async fn test_daily_stats() {
        let store = test_store().await;
        store.insert_lead(&sample("a@test.com", 50)).await.unwrap();
        store.insert_lead(&sample("b@test.com", 60)).await.unwrap();

        let stats = store.daily_stats(28).await.unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].count, 2);
    }

    #[tokio::test]
    async fn test_scores_for_quality_report() {
        let store = test_store().await;
        store.insert_lead(&sample("a@test.com", 95)).await.unwrap();
        store.insert_lead(&sample("b@test.com", 10)).await.unwrap();
        let mut scores = store.lead_scores().await.unwrap();
        scores.sort_unstable();
        assert_eq!(scores, vec![10, 95]);
    }
}
