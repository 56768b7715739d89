//! Rule-based lead qualification
//!
//! Features:
//! - Deterministic additive lead scorer (0-100)
//! - Score categorization with action recommendations
//! - Batch lead-quality analysis
//! - Two-stage contact extraction from chat text
//! - Contact/intent signal detection
//!
//! Everything in this crate is pure and synchronous; callers decide
//! what to do with the numbers.

pub mod analyzer;
pub mod category;
pub mod extractor;
pub mod keywords;
pub mod scorer;
pub mod signals;

pub use analyzer::{analyze, analyze_inputs, LeadQualityReport, ScoreHistogram};
pub use category::{categorize, ScoreCategory};
pub use extractor::ContactExtractor;
pub use scorer::{score, ScoringInput};
pub use signals::{SignalDetector, Signals};
