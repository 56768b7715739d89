//! Conversation orchestration.

use std::sync::Arc;
use tracing::{debug, warn};

use leadgate_llm::{GenerationParams, LlmBackend, Message, PromptBuilder};

use crate::qa::predefined_answer;

/// Reply used whenever generation fails. The visitor never sees an
/// error.
pub const FALLBACK_REPLY: &str =
    "Lo siento, tengo problemas técnicos. ¿Puedes intentar de nuevo?";

/// Drives one chat turn: predefined answers first, then the LLM.
pub struct ChatAgent {
    backend: Arc<dyn LlmBackend>,
    params: GenerationParams,
    history_window: usize,
}

impl ChatAgent {
    pub fn new(backend: Arc<dyn LlmBackend>, history_window: usize) -> Self {
        Self {
            backend,
            params: GenerationParams::default(),
            history_window,
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Produce a reply for `message` given the prior turns. Infallible
    /// by contract: provider failures become [`FALLBACK_REPLY`].
    pub async fn respond(&self, message: &str, history: &[Message]) -> String {
        if let Some(answer) = predefined_answer(message) {
            debug!("predefined answer matched");
            return answer.to_string();
        }

        let messages = PromptBuilder::new()
            .with_history_window(self.history_window)
            .system_prompt()
            .with_history(history)
            .user_message(message)
            .build();

        match self.backend.generate(&messages, &self.params).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(%err, backend = self.backend.name(), "generation failed, using fallback");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use leadgate_llm::LlmError;

    struct FixedBackend {
        reply: Option<String>,
    }

    #[async_trait]
    impl LlmBackend for FixedBackend {
        async fn generate(
            &self,
            _messages: &[Message],
            _params: &GenerationParams,
        ) -> Result<String, LlmError> {
            self.reply
                .clone()
                .ok_or_else(|| LlmError::Request("down".to_string()))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_predefined_short_circuits_backend() {
        let agent = ChatAgent::new(Arc::new(FixedBackend { reply: None }), 6);
        let reply = agent.respond("¿Cuánto cuesta?", &[]).await;
        assert!(reply.contains("$300-500"));
    }

    #[tokio::test]
    async fn test_generative_reply() {
        let agent = ChatAgent::new(
            Arc::new(FixedBackend {
                reply: Some("Con gusto te ayudo.".to_string()),
            }),
            6,
        );
        let reply = agent.respond("necesito migrar mi ERP", &[]).await;
        assert_eq!(reply, "Con gusto te ayudo.");
    }

    #[tokio::test]
    async fn test_backend_failure_becomes_fallback() {
        let agent = ChatAgent::new(Arc::new(FixedBackend { reply: None }), 6);
        let reply = agent.respond("necesito migrar mi ERP", &[]).await;
        assert_eq!(reply, FALLBACK_REPLY);
    }
}
