//! Per-IP fixed-window rate limiting.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

const WINDOW: Duration = Duration::from_secs(60);

struct Window {
    started: Instant,
    count: u32,
}

/// Fixed one-minute window per client IP. Applied to the public
/// endpoints (chat, contact); admin reads are not limited.
pub struct RateLimiter {
    limit: u32,
    windows: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    pub fn new(limit: u32) -> Arc<Self> {
        Arc::new(Self {
            limit,
            windows: Mutex::new(HashMap::new()),
        })
    }

    /// Record one request from `ip`. Returns false when the window
    /// budget is spent.
    pub fn check(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock();
        let window = windows.entry(ip).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(window.started) >= WINDOW {
            window.started = now;
            window.count = 0;
        }
        window.count += 1;
        window.count <= self.limit
    }

    /// Drop windows that expired. Called from a background task.
    pub fn cleanup(&self) {
        let now = Instant::now();
        let mut windows = self.windows.lock();
        let before = windows.len();
        windows.retain(|_, w| now.duration_since(w.started) < WINDOW);
        let removed = before - windows.len();
        if removed > 0 {
            debug!(removed, "expired rate-limit windows dropped");
        }
    }

    /// Periodic cleanup so idle IPs do not accumulate.
    pub fn start_cleanup_task(self: &Arc<Self>) {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(300));
            loop {
                interval.tick().await;
                limiter.cleanup();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([127, 0, 0, last])
    }

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = RateLimiter::new(3);
        for _ in 0..3 {
            assert!(limiter.check(ip(1)));
        }
        assert!(!limiter.check(ip(1)));
    }

    #[test]
    fn test_ips_are_independent() {
        let limiter = RateLimiter::new(1);
        assert!(limiter.check(ip(1)));
        assert!(limiter.check(ip(2)));
        assert!(!limiter.check(ip(1)));
    }

    #[test]
    fn test_cleanup_keeps_active_windows() {
        let limiter = RateLimiter::new(5);
        limiter.check(ip(1));
        limiter.cleanup();
        // Window still active, second request counts against it.
        assert!(limiter.check(ip(1)));
    }
}
