//! Lead records as persisted and served by the admin API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Lifecycle status of a lead. Transitions happen only through the
/// admin update endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Negotiating,
    Scheduled,
    Converted,
    Lost,
    Spam,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Negotiating => "negotiating",
            LeadStatus::Scheduled => "scheduled",
            LeadStatus::Converted => "converted",
            LeadStatus::Lost => "lost",
            LeadStatus::Spam => "spam",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(LeadStatus::New),
            "contacted" => Some(LeadStatus::Contacted),
            "negotiating" => Some(LeadStatus::Negotiating),
            "scheduled" => Some(LeadStatus::Scheduled),
            "converted" => Some(LeadStatus::Converted),
            "lost" => Some(LeadStatus::Lost),
            "spam" => Some(LeadStatus::Spam),
            _ => None,
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a lead entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    LandingForm,
    Chat,
    Imported,
}

impl LeadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::LandingForm => "landing_form",
            LeadSource::Chat => "chat",
            LeadSource::Imported => "imported",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "landing_form" => Some(LeadSource::LandingForm),
            "chat" => Some(LeadSource::Chat),
            "imported" => Some(LeadSource::Imported),
            _ => None,
        }
    }
}

impl fmt::Display for LeadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted lead row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lead {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub service: String,
    pub score: i64,
    pub status: String,
    pub source: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub contacted_at: Option<DateTime<Utc>>,
}

impl Lead {
    pub fn status_enum(&self) -> Option<LeadStatus> {
        LeadStatus::parse(&self.status)
    }

    pub fn source_enum(&self) -> Option<LeadSource> {
        LeadSource::parse(&self.source)
    }
}

/// Fields needed to insert a lead. Timestamps and id are assigned by
/// the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub service: String,
    pub score: u8,
    pub source: LeadSource,
}

impl NewLead {
    pub fn new(source: LeadSource) -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            message: String::new(),
            service: String::new(),
            score: 0,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            LeadStatus::New,
            LeadStatus::Contacted,
            LeadStatus::Negotiating,
            LeadStatus::Scheduled,
            LeadStatus::Converted,
            LeadStatus::Lost,
            LeadStatus::Spam,
        ] {
            assert_eq!(LeadStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(LeadStatus::parse("bogus"), None);
    }

    #[test]
    fn test_source_round_trip() {
        for source in [LeadSource::LandingForm, LeadSource::Chat, LeadSource::Imported] {
            assert_eq!(LeadSource::parse(source.as_str()), Some(source));
        }
    }
}
