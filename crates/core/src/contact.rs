//! Extracted contact information.

use serde::{Deserialize, Serialize};

/// Maximum stored field lengths. Longer extracted values are truncated,
/// never rejected.
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 255;
pub const MAX_PHONE_LEN: usize = 20;
pub const MAX_CLIENT_TYPE_LEN: usize = 50;
pub const MAX_PROBLEM_LEN: usize = 500;
pub const MAX_SERVICE_LEN: usize = 100;

/// Contact details pulled out of free text or a structured submission.
/// All fields default to empty; an empty record is a valid result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub client_type: String,
    pub problem: String,
    pub service: String,
}

impl ContactRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.email.is_empty()
            && self.phone.is_empty()
            && self.client_type.is_empty()
            && self.problem.is_empty()
            && self.service.is_empty()
    }

    /// True when the record carries enough to hand off to a human:
    /// name, email and phone all present.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.email.is_empty() && !self.phone.is_empty()
    }
}

/// Truncate to a maximum length on a char boundary.
pub fn truncate(value: &str, max: usize) -> String {
    if value.len() <= max {
        return value.to_string();
    }
    let mut end = max;
    while end > 0 && !value.is_char_boundary(end) {
        end -= 1;
    }
    value[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record() {
        let record = ContactRecord::new();
        assert!(record.is_empty());
        assert!(!record.is_complete());
    }

    #[test]
    fn test_complete_requires_all_three() {
        let mut record = ContactRecord::new();
        record.name = "Ana".into();
        record.email = "ana@test.com".into();
        assert!(!record.is_complete());
        record.phone = "600123456".into();
        assert!(record.is_complete());
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        let truncated = truncate("automatización", 13);
        assert!(truncated.len() <= 13);
        assert!("automatización".starts_with(&truncated));
    }
}
