//! Prompt building for the IT-consulting chat agent.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How many history turns are kept in the prompt by default.
pub const DEFAULT_HISTORY_WINDOW: usize = 6;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The consultant persona. The agent answers as the business owner,
/// briefly, in Spanish, and steers serious inquiries to the advisory
/// form.
const CONSULTANT_SYSTEM_PROMPT: &str = r#"ERES: un Consultor Senior en Automatización IT con más de 20 años de experiencia. NO eres un bot, ERES el especialista titular.

TUS SERVICIOS:
1. Automatización de procesos (Python, n8n, Zapier) — facturas automáticas, envío de emails, sincronización de datos.
2. Seguridad lógica y ciberseguridad — auditoría, backups automáticos, protección contra ransomware.
3. Soporte IT — mantenimiento de infraestructura, resolución de problemas, monitoreo.
4. Consultoría estratégica — arquitecturas escalables y transformación digital para PyMEs.

PERFIL: especialista en Python y automatización, enfocado en PyMEs de 5 a 50 personas. Disponible lunes a viernes de 9 a 18hs; fuera de horario responde por WhatsApp.

REGLAS DE ORO:
1. Brevedad ejecutiva: máximo 2-3 líneas. Ve al grano, como un empresario ocupado, no como un chatbot.
2. Lenguaje profesional pero accesible, en español neutral, sin jerga innecesaria.
3. Si preguntan por servicios, precios u horarios: responde breve. Si quieren contratar o consultar: sugiere completar el formulario de asesoría para analizar su caso.

NO DEBES: sonar como bot, dar respuestas largas, enumerar características, prometer lo que no puedes cumplir, presionar si dicen que no, ni dar soporte técnico gratis en el chat."#;

/// Prompt builder for the consulting chat agent
pub struct PromptBuilder {
    messages: Vec<Message>,
    history_window: usize,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }

    /// Override the number of history turns kept in the prompt.
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    /// Add the fixed consultant system prompt.
    pub fn system_prompt(mut self) -> Self {
        self.messages.push(Message::system(CONSULTANT_SYSTEM_PROMPT));
        self
    }

    /// Add conversation history, keeping only the most recent turns.
    pub fn with_history(mut self, history: &[Message]) -> Self {
        let start = history.len().saturating_sub(self.history_window);
        self.messages.extend(history[start..].iter().cloned());
        self
    }

    /// Add the current user message.
    pub fn user_message(mut self, message: &str) -> Self {
        self.messages.push(Message::user(message));
        self
    }

    /// Build the final message list.
    pub fn build(self) -> Vec<Message> {
        self.messages
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::user("Hola");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hola");
    }

    #[test]
    fn test_prompt_shape() {
        let messages = PromptBuilder::new()
            .system_prompt()
            .user_message("¿Cuánto cuesta?")
            .build();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
    }

    #[test]
    fn test_history_windowing() {
        let history: Vec<Message> = (0..10)
            .map(|i| {
                if i % 2 == 0 {
                    Message::user(format!("u{i}"))
                } else {
                    Message::assistant(format!("a{i}"))
                }
            })
            .collect();

        let messages = PromptBuilder::new()
            .system_prompt()
            .with_history(&history)
            .user_message("hola")
            .build();

        // system + last 6 turns + current message
        assert_eq!(messages.len(), 8);
        assert_eq!(messages[1].content, "u4");
    }

    #[test]
    fn test_short_history_kept_whole() {
        let history = vec![Message::user("u0"), Message::assistant("a0")];
        let messages = PromptBuilder::new()
            .system_prompt()
            .with_history(&history)
            .user_message("hola")
            .build();
        assert_eq!(messages.len(), 4);
    }
}
