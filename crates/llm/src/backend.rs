//! Chat-completion backends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::prompt::Message;
use crate::LlmError;

/// Decoding parameters for one generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.6,
            max_tokens: 250,
        }
    }
}

/// Backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the provider, e.g. `https://api.groq.com`.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com".to_string(),
            api_key: String::new(),
            model: "llama-3.3-70b-versatile".to_string(),
            timeout_secs: 30,
            max_retries: 2,
        }
    }
}

/// Abstraction over a chat-completion provider.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Generate a completion for the given message list.
    async fn generate(&self, messages: &[Message], params: &GenerationParams)
        -> Result<String, LlmError>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Groq chat-completion backend (OpenAI-compatible API).
pub struct GroqBackend {
    config: LlmConfig,
    client: reqwest::Client,
}

impl GroqBackend {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        if config.api_key.is_empty() {
            return Err(LlmError::Config("Groq API key is empty".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/openai/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn execute_request(
        &self,
        messages: &[Message],
        params: &GenerationParams,
    ) -> Result<String, LlmError> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("no choices in response".to_string()))?;

        Ok(content.trim().to_string())
    }

    fn is_retryable(error: &LlmError) -> bool {
        match error {
            LlmError::Timeout | LlmError::Request(_) => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[async_trait]
impl LlmBackend for GroqBackend {
    async fn generate(
        &self,
        messages: &[Message],
        params: &GenerationParams,
    ) -> Result<String, LlmError> {
        let mut attempt = 0;
        loop {
            match self.execute_request(messages, params).await {
                Ok(content) => {
                    debug!(model = %self.config.model, attempt, "completion received");
                    return Ok(content);
                }
                Err(err) if attempt < self.config.max_retries && Self::is_retryable(&err) => {
                    let backoff = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(%err, attempt, ?backoff, "completion failed, retrying");
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn name(&self) -> &str {
        "groq"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_api_key() {
        let result = GroqBackend::new(LlmConfig::default());
        assert!(matches!(result, Err(LlmError::Config(_))));
    }

    #[test]
    fn test_endpoint_handles_trailing_slash() {
        let config = LlmConfig {
            api_key: "k".to_string(),
            base_url: "https://api.groq.com/".to_string(),
            ..LlmConfig::default()
        };
        let backend = GroqBackend::new(config).unwrap();
        assert_eq!(
            backend.endpoint(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(GroqBackend::is_retryable(&LlmError::Timeout));
        assert!(GroqBackend::is_retryable(&LlmError::Api {
            status: 503,
            body: String::new()
        }));
        assert!(GroqBackend::is_retryable(&LlmError::Api {
            status: 429,
            body: String::new()
        }));
        assert!(!GroqBackend::is_retryable(&LlmError::Api {
            status: 401,
            body: String::new()
        }));
        assert!(!GroqBackend::is_retryable(&LlmError::InvalidResponse(
            String::new()
        )));
    }

    #[test]
    fn test_default_params() {
        let params = GenerationParams::default();
        assert_eq!(params.max_tokens, 250);
        assert!((params.temperature - 0.6).abs() < f32::EPSILON);
    }
}
