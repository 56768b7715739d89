//! Configuration
//!
//! Layered settings: built-in defaults, then an optional TOML file,
//! then `LEADGATE_`-prefixed environment variables (double underscore
//! as section separator, e.g. `LEADGATE_LLM__API_KEY`).

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS. Empty means same-origin only.
    pub cors_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://leads.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com".to_string(),
            api_key: String::new(),
            model: "llama-3.3-70b-versatile".to_string(),
            timeout_secs: 30,
            max_retries: 2,
            temperature: 0.6,
            max_tokens: 250,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramSettings {
    pub token: String,
    pub chat_id: String,
}

impl TelegramSettings {
    pub fn is_configured(&self) -> bool {
        !self.token.is_empty() && !self.chat_id.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SendgridSettings {
    pub api_key: String,
    pub from_email: String,
    pub from_name: String,
}

impl Default for SendgridSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            from_email: String::new(),
            from_name: "Consultoría IT".to_string(),
        }
    }
}

impl SendgridSettings {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.from_email.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AirtableSettings {
    pub api_key: String,
    pub base_id: String,
    pub table_name: String,
}

impl Default for AirtableSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_id: String::new(),
            table_name: "Leads".to_string(),
        }
    }
}

impl AirtableSettings {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.base_id.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookSettings {
    pub url: String,
}

impl WebhookSettings {
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Prior turns included in the LLM prompt.
    pub history_limit: usize,
    /// Upper bound on one chat message, in characters.
    pub max_message_len: usize,
    /// Fixed-window per-IP request budget per minute.
    pub rate_limit_per_minute: u32,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            history_limit: 6,
            max_message_len: 1000,
            rate_limit_per_minute: 20,
        }
    }
}

/// Full application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub llm: LlmSettings,
    pub telegram: TelegramSettings,
    pub sendgrid: SendgridSettings,
    pub airtable: AirtableSettings,
    pub webhook: WebhookSettings,
    pub chat: ChatSettings,
}

impl Settings {
    /// Load settings: defaults, then the optional file, then env vars.
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(name) = config_file {
            builder = builder.add_source(config::File::with_name(name).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("LEADGATE")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("server.cors_origins"),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    /// Fail fast on configuration the server cannot run without.
    /// Optional channels only warn when absent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.api_key.is_empty() {
            return Err(ConfigError::Validation(
                "llm.api_key is required (LEADGATE_LLM__API_KEY)".to_string(),
            ));
        }
        if (self.telegram.token.is_empty()) != (self.telegram.chat_id.is_empty()) {
            return Err(ConfigError::Validation(
                "telegram needs both token and chat_id".to_string(),
            ));
        }
        if !self.telegram.is_configured() {
            warn!("telegram not configured, lead alerts disabled");
        }
        if !self.sendgrid.is_configured() {
            warn!("sendgrid not configured, emails disabled");
        }
        if !self.airtable.is_configured() {
            warn!("airtable not configured, CRM sync disabled");
        }
        if !self.webhook.is_configured() {
            warn!("workflow webhook not configured");
        }
        Ok(())
    }
}
