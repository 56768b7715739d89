//! Payload shared by all outbound notification channels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything a channel needs to announce a new lead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadNotification {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub service: String,
    pub score: u8,
    pub source: String,
    pub received_at: DateTime<Utc>,
}

impl LeadNotification {
    /// True when there is no contact to reach. Channels skip these.
    pub fn has_contact(&self) -> bool {
        !self.email.is_empty() || !self.phone.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_contact() {
        let mut n = LeadNotification {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            message: String::new(),
            service: String::new(),
            score: 0,
            source: "chat".into(),
            received_at: Utc::now(),
        };
        assert!(!n.has_contact());
        n.phone = "600123456".into();
        assert!(n.has_contact());
    }
}
