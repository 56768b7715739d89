//! leadgate — lead-capture backend.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use leadgate_agent::ChatAgent;
use leadgate_config::Settings;
use leadgate_llm::{GenerationParams, GroqBackend, LlmConfig};
use leadgate_notify::{
    AirtableClient, EmailClient, NotificationFanout, TelegramClient, WebhookClient,
};
use leadgate_scoring::{ContactExtractor, SignalDetector};
use leadgate_server::rate_limit::RateLimiter;
use leadgate_server::{create_router, AppState};
use leadgate_store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_file = std::env::var("LEADGATE_CONFIG").unwrap_or_else(|_| "leadgate".into());
    let settings = Settings::load(Some(&config_file)).context("loading settings")?;
    settings.validate().context("validating settings")?;
    let settings = Arc::new(settings);

    let store = Store::connect(&settings.database.url)
        .await
        .context("opening database")?;

    let backend = GroqBackend::new(LlmConfig {
        base_url: settings.llm.base_url.clone(),
        api_key: settings.llm.api_key.clone(),
        model: settings.llm.model.clone(),
        timeout_secs: settings.llm.timeout_secs,
        max_retries: settings.llm.max_retries,
    })
    .context("building LLM backend")?;
    let agent = ChatAgent::new(Arc::new(backend), settings.chat.history_limit).with_params(
        GenerationParams {
            temperature: settings.llm.temperature,
            max_tokens: settings.llm.max_tokens,
        },
    );

    let fanout = build_fanout(&settings)?;
    info!(channels = fanout.channel_count(), "notification channels configured");

    let rate_limiter = RateLimiter::new(settings.chat.rate_limit_per_minute);
    rate_limiter.start_cleanup_task();

    let state = AppState {
        settings: Arc::clone(&settings),
        store,
        agent: Arc::new(agent),
        extractor: ContactExtractor::new(),
        detector: SignalDetector::new(),
        fanout,
        rate_limiter,
    };

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("parsing listen address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("binding listener")?;
    info!(%addr, "leadgate listening");

    axum::serve(
        listener,
        create_router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("serving")?;

    Ok(())
}

fn build_fanout(settings: &Settings) -> anyhow::Result<NotificationFanout> {
    let mut fanout = NotificationFanout::new();
    if settings.telegram.is_configured() {
        fanout = fanout.with_telegram(TelegramClient::new(
            settings.telegram.token.clone(),
            settings.telegram.chat_id.clone(),
        )?);
    }
    if settings.sendgrid.is_configured() {
        fanout = fanout.with_email(EmailClient::new(
            settings.sendgrid.api_key.clone(),
            settings.sendgrid.from_email.clone(),
            settings.sendgrid.from_name.clone(),
        )?);
    }
    if settings.airtable.is_configured() {
        fanout = fanout.with_airtable(AirtableClient::new(
            settings.airtable.api_key.clone(),
            settings.airtable.base_id.clone(),
            settings.airtable.table_name.clone(),
        )?);
    }
    if settings.webhook.is_configured() {
        fanout = fanout.with_webhook(WebhookClient::new(settings.webhook.url.clone())?);
    }
    Ok(fanout)
}
