//! Contact and intent signal detection.
//!
//! Feeds the boolean flags of the scorer: does the conversation carry
//! reachable contact details, and has the visitor asked to be
//! contacted?

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_SIGNAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());

// Eight or more digits, optionally grouped with spaces.
static PHONE_SIGNAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+?\d[\d\s]{6,}\d").unwrap());

/// Phrases that signal intent to be contacted or to buy.
static INTENT_PHRASES: &[&str] = &[
    "reunion",
    "reunión",
    "llamame",
    "llámame",
    "contactame",
    "contáctame",
    "agenda",
    "agendar",
    "whatsapp",
    "wp",
    "wa",
    "presupuesto",
    "cotización",
    "enviame",
    "envíame",
    "necesito",
    "me interesa",
];

/// Detected signals for one stretch of conversation text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signals {
    pub has_contact: bool,
    pub has_intent: bool,
}

/// Scans text for contact details and engagement intent.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalDetector;

impl SignalDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect(&self, text: &str) -> Signals {
        let lower = text.to_lowercase();
        Signals {
            has_contact: EMAIL_SIGNAL.is_match(text) || PHONE_SIGNAL.is_match(text),
            has_intent: INTENT_PHRASES.iter().any(|p| contains_word_or_phrase(&lower, p)),
        }
    }
}

/// Multi-word phrases match as substrings; single words must stand
/// alone so that "wa" does not fire inside "watch".
fn contains_word_or_phrase(text: &str, phrase: &str) -> bool {
    if phrase.contains(' ') {
        return text.contains(phrase);
    }
    text.split(|c: char| !c.is_alphanumeric()).any(|w| w == phrase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_signal() {
        let signals = SignalDetector::new().detect("mi correo es ana@test.com");
        assert!(signals.has_contact);
        assert!(!signals.has_intent);
    }

    #[test]
    fn test_phone_signal() {
        let signals = SignalDetector::new().detect("mi número es 612 345 678");
        assert!(signals.has_contact);
    }

    #[test]
    fn test_intent_phrase() {
        let signals = SignalDetector::new().detect("Llámame para agendar una reunión");
        assert!(signals.has_intent);
    }

    #[test]
    fn test_multiword_intent() {
        let signals = SignalDetector::new().detect("me interesa el servicio");
        assert!(signals.has_intent);
    }

    #[test]
    fn test_short_word_needs_boundary() {
        let signals = SignalDetector::new().detect("quiero ver el watch party");
        assert!(!signals.has_intent);
    }

    #[test]
    fn test_neutral_text() {
        let signals = SignalDetector::new().detect("¿qué servicios ofrecen?");
        assert_eq!(signals, Signals::default());
    }
}
