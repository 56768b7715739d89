//! Shared application state.

use std::sync::Arc;

use leadgate_agent::ChatAgent;
use leadgate_config::Settings;
use leadgate_notify::NotificationFanout;
use leadgate_scoring::{ContactExtractor, SignalDetector};
use leadgate_store::Store;

use crate::rate_limit::RateLimiter;

/// Everything the handlers need, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub store: Store,
    pub agent: Arc<ChatAgent>,
    pub extractor: ContactExtractor,
    pub detector: SignalDetector,
    pub fanout: NotificationFanout,
    pub rate_limiter: Arc<RateLimiter>,
}
