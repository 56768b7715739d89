//! Two-stage contact extraction.
//!
//! Stage A handles the structured submission format the landing chat
//! widget emits (pipe-separated fields). Stage B falls back to regex
//! and token heuristics over free text. Fields that cannot be found
//! stay empty; extraction never fails.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use leadgate_core::contact::{
    truncate, ContactRecord, MAX_CLIENT_TYPE_LEN, MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PHONE_LEN,
    MAX_PROBLEM_LEN, MAX_SERVICE_LEN,
};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());

/// Phone formats tried in priority order; the first candidate with at
/// least eight digits wins.
static PHONE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // International with grouped digits
        Regex::new(r"\+\d{1,3}\s?\d{1,4}\s?\d{1,4}\s?\d{1,4}").unwrap(),
        // International, compact
        Regex::new(r"\+\d{1,3}\s?\d{7,14}").unwrap(),
        // Local with grouping, anchored to a word start
        Regex::new(r"(?:^|\s)(\d{2,4}\s?\d{3,4}\s?\d{4})").unwrap(),
        // Colombian mobile
        Regex::new(r"3\d{9}").unwrap(),
    ]
});

/// Tokens that look like names but never are.
static NAME_STOPLIST: &[&str] = &[
    "interesado",
    "en:",
    "automatización",
    "seguridad",
    "soporte",
    "consulta",
    "hola",
    "perfecto",
    "gracias",
    "particular",
    "comercio",
    "oficina",
    "empresa",
];

/// Client-type labels and their trigger words, in priority order.
static CLIENT_TYPES: &[(&str, &[&str])] = &[
    ("Particular", &["particular", "autónomo"]),
    ("Comercio", &["comercio"]),
    ("Oficina", &["oficina"]),
    ("Empresa", &["empresa"]),
];

/// Service labels and their trigger words, in priority order.
static SERVICES: &[(&str, &[&str])] = &[
    ("Automatización", &["automatización", "automatizar"]),
    ("Seguridad IT", &["seguridad"]),
    ("Soporte IT", &["soporte"]),
    ("Consulta General", &["consulta"]),
];

/// Labels the widget prepends to the service segment.
static SERVICE_LABELS: &[&str] = &["Interested in:", "Interesado en:"];

/// Extracts contact details from chat text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactExtractor;

impl ContactExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract a fresh [`ContactRecord`] from `text`. Structured
    /// pipe-separated input is parsed positionally; anything else goes
    /// through the free-text heuristics.
    pub fn extract(&self, text: &str) -> ContactRecord {
        if let Some(record) = self.extract_structured(text) {
            debug!(?record, "structured contact extraction");
            return record;
        }
        let record = self.extract_freeform(text);
        debug!(?record, "freeform contact extraction");
        record
    }

    /// Stage A: pipe-separated submission with at least six segments,
    /// in the fixed order name, email, client type, problem, phone,
    /// service. The email segment must look like an address; anything
    /// else means the pipes were incidental and stage B should run.
    fn extract_structured(&self, text: &str) -> Option<ContactRecord> {
        let segments: Vec<&str> = text.split(" | ").map(str::trim).collect();
        if segments.len() < 6 {
            return None;
        }
        if !segments[1].contains('@') {
            return None;
        }

        // The service field is whatever follows the widget's label; a
        // sixth segment without one is trailing chatter, not a service.
        let service = SERVICE_LABELS
            .iter()
            .find_map(|label| segments[5].strip_prefix(label))
            .map(str::trim)
            .unwrap_or("");

        Some(ContactRecord {
            name: truncate(segments[0], MAX_NAME_LEN),
            email: truncate(segments[1], MAX_EMAIL_LEN),
            client_type: truncate(segments[2], MAX_CLIENT_TYPE_LEN),
            problem: truncate(segments[3], MAX_PROBLEM_LEN),
            phone: truncate(segments[4], MAX_PHONE_LEN),
            service: truncate(service, MAX_SERVICE_LEN),
        })
    }

    /// Stage B: regex and token heuristics over free text.
    fn extract_freeform(&self, text: &str) -> ContactRecord {
        let mut record = ContactRecord::new();
        let lower = text.to_lowercase();

        if let Some(m) = EMAIL_PATTERN.find(text) {
            record.email = truncate(m.as_str(), MAX_EMAIL_LEN);
        }

        if let Some(phone) = self.find_phone(text) {
            record.phone = truncate(&phone, MAX_PHONE_LEN);
        }

        if let Some(name) = self.find_name(text) {
            record.name = truncate(&name, MAX_NAME_LEN);
        }

        for (label, triggers) in CLIENT_TYPES {
            if triggers.iter().any(|t| lower.contains(t)) {
                record.client_type = (*label).to_string();
                break;
            }
        }

        for (label, triggers) in SERVICES {
            if triggers.iter().any(|t| lower.contains(t)) {
                record.service = (*label).to_string();
                break;
            }
        }

        record
    }

    fn find_phone(&self, text: &str) -> Option<String> {
        for pattern in PHONE_PATTERNS.iter() {
            if let Some(captures) = pattern.captures(text) {
                let matched = captures.get(1).or_else(|| captures.get(0));
                if let Some(m) = matched {
                    let candidate = m.as_str().trim();
                    let digit_count = candidate.chars().filter(char::is_ascii_digit).count();
                    if digit_count >= 8 {
                        return Some(candidate.to_string());
                    }
                }
            }
        }
        None
    }

    /// First token that plausibly is a person's name: capitalized,
    /// longer than two characters, not a known filler word, free of
    /// digits and '@'.
    fn find_name(&self, text: &str) -> Option<String> {
        for token in text.split_whitespace() {
            let cleaned = token.trim_end_matches([',', '.', '!', '?']);
            if cleaned.chars().count() <= 2 {
                continue;
            }
            let starts_upper = cleaned.chars().next().is_some_and(char::is_uppercase);
            if !starts_upper {
                continue;
            }
            if cleaned.contains('@') || cleaned.chars().any(|c| c.is_ascii_digit()) {
                continue;
            }
            if NAME_STOPLIST.contains(&cleaned.to_lowercase().as_str()) {
                continue;
            }
            return Some(cleaned.to_string());
        }
        None
    }
}
