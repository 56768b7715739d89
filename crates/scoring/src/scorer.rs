//! Additive rule-based lead scorer.
//!
//! The algorithm is a fixed sum of factors over the lowercased,
//! trimmed message plus conversation flags, clamped to [0, 100]. It is
//! deterministic and never fails.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::keywords::{NEGATIVE_KEYWORDS, POSITIVE_KEYWORDS, TECHNICAL_TERMS, URGENCY_TERMS};

/// Base score every message starts with.
const BASE_SCORE: i32 = 20;
/// Bonus when contact details were detected in the conversation.
const CONTACT_BONUS: i32 = 35;
/// Bonus when intent to engage was detected.
const INTENT_BONUS: i32 = 15;
/// Cap on the positive-keyword sum. Negatives are uncapped.
const POSITIVE_CAP: i32 = 20;
/// Cap on the history bonus (3 points per prior turn).
const HISTORY_CAP: i32 = 10;

static ANY_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").unwrap());

static VOLUME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\s*(emails?|facturas?|pedidos?|clientes?)").unwrap());

/// Input to one scoring pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringInput {
    pub message: String,
    pub has_contact: bool,
    pub has_intent: bool,
    pub history_len: usize,
}

impl ScoringInput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            has_contact: false,
            has_intent: false,
            history_len: 0,
        }
    }

    pub fn with_signals(mut self, has_contact: bool, has_intent: bool) -> Self {
        self.has_contact = has_contact;
        self.has_intent = has_intent;
        self
    }

    pub fn with_history_len(mut self, history_len: usize) -> Self {
        self.history_len = history_len;
        self
    }
}

/// Score a message. Total over all inputs, result always in [0, 100].
pub fn score(input: &ScoringInput) -> u8 {
    let text = input.message.trim().to_lowercase();
    let mut total = BASE_SCORE;

    if input.has_contact {
        total += CONTACT_BONUS;
    }
    if input.has_intent {
        total += INTENT_BONUS;
    }

    let length = text.chars().count();
    let length_bonus = if length >= 100 {
        10
    } else if length >= 50 {
        5
    } else {
        0
    };
    total += length_bonus;

    let mut positive = 0;
    for (keyword, weight) in POSITIVE_KEYWORDS {
        if text.contains(keyword) {
            positive += weight;
        }
    }
    let positive = positive.min(POSITIVE_CAP);
    total += positive;

    let mut negative = 0;
    for (keyword, weight) in NEGATIVE_KEYWORDS {
        if text.contains(keyword) {
            negative += weight;
        }
    }
    total += negative;

    let digit_bonus = if ANY_DIGIT.is_match(&text) { 5 } else { 0 };
    total += digit_bonus;

    let history_bonus = (input.history_len as i32 * 3).min(HISTORY_CAP);
    total += history_bonus;

    let specificity = specificity_bonus(&text);
    total += specificity;

    let clamped = total.clamp(0, 100) as u8;

    debug!(
        score = clamped,
        raw = total,
        has_contact = input.has_contact,
        has_intent = input.has_intent,
        length_bonus,
        positive,
        negative,
        digit_bonus,
        history_bonus,
        specificity,
        "lead scored"
    );

    clamped
}

/// Bonus for concrete detail: a workload volume, a technical term, an
/// urgency marker.
fn specificity_bonus(text: &str) -> i32 {
    let mut bonus = 0;
    if VOLUME_PATTERN.is_match(text) {
        bonus += 5;
    }
    if TECHNICAL_TERMS.iter().any(|t| text.contains(t)) {
        bonus += 5;
    }
    if URGENCY_TERMS.iter().any(|t| text.contains(t)) {
        bonus += 3;
    }
    bonus
}
