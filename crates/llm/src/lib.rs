//! LLM Integration
//!
//! Features:
//! - Backend abstraction over OpenAI-compatible chat completions
//! - Groq backend with retry and exponential backoff
//! - Prompt building with history windowing

pub mod backend;
pub mod prompt;

pub use backend::{GenerationParams, GroqBackend, LlmBackend, LlmConfig};
pub use prompt::{Message, PromptBuilder, Role};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Request error: {0}")]
    Request(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timeout")]
    Timeout,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(err.to_string())
        }
    }
}
