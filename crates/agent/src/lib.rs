//! Chat Agent
//!
//! Features:
//! - Predefined question/answer matching for common inquiries
//! - LLM-backed response generation with history windowing
//! - Fixed fallback reply when the provider is unavailable

pub mod orchestrator;
pub mod qa;

pub use orchestrator::{ChatAgent, FALLBACK_REPLY};
pub use qa::predefined_answer;
