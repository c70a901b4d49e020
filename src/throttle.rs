//! Rate limiting and slow-down for the search route.
//!
//! Counts requests in a fixed process-wide window (the reference deployment
//! throttled globally, not per client). Requests beyond `delay_after` in the
//! window are delayed by a growing amount, and requests beyond
//! `max_requests` are rejected outright with a 429.

use crate::config::ThrottleConfig;
use crate::server::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// Message returned with a 429 when the window is exhausted.
pub const RATE_LIMIT_MESSAGE: &str = "Too many API requests, please try again later...";

/// What to do with one incoming request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    Proceed,
    Delay(Duration),
    Reject,
}

struct Window {
    started: Instant,
    hits: u32,
}

/// Process-wide request throttle with a fixed window.
pub struct Throttle {
    config: ThrottleConfig,
    window: Mutex<Window>,
}

impl Throttle {
    #[must_use]
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            config,
            window: Mutex::new(Window {
                started: Instant::now(),
                hits: 0,
            }),
        }
    }

    /// Register one request and decide its fate.
    pub fn register(&self) -> ThrottleDecision {
        self.register_at(Instant::now())
    }

    fn register_at(&self, now: Instant) -> ThrottleDecision {
        let mut window = match self.window.lock() {
            Ok(guard) => guard,
            Err(e) => {
                // Fail open rather than blocking all searches
                error!("Failed to acquire throttle lock: {e}");
                return ThrottleDecision::Proceed;
            }
        };

        if now.duration_since(window.started) >= Duration::from_secs(self.config.window_secs) {
            window.started = now;
            window.hits = 0;
        }
        window.hits += 1;

        if window.hits > self.config.max_requests {
            ThrottleDecision::Reject
        } else if window.hits > self.config.delay_after {
            let excess = u64::from(window.hits - self.config.delay_after);
            ThrottleDecision::Delay(Duration::from_millis(excess * self.config.delay_ms))
        } else {
            ThrottleDecision::Proceed
        }
    }
}

/// Axum middleware applying the throttle to a route.
pub async fn limit_search(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    match state.throttle.register() {
        ThrottleDecision::Proceed => next.run(request).await,
        ThrottleDecision::Delay(delay) => {
            debug!("Throttling search request by {}ms", delay.as_millis());
            tokio::time::sleep(delay).await;
            next.run(request).await
        }
        ThrottleDecision::Reject => {
            warn!("Search request rejected by rate limiter");
            (StatusCode::TOO_MANY_REQUESTS, RATE_LIMIT_MESSAGE).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn throttle(max_requests: u32, delay_after: u32, delay_ms: u64) -> Throttle {
        Throttle::new(ThrottleConfig {
            window_secs: 60,
            max_requests,
            delay_after,
            delay_ms,
        })
    }

    #[test]
    fn test_requests_below_threshold_proceed() {
        let throttle = throttle(5, 3, 1000);
        for _ in 0..3 {
            assert_eq!(throttle.register(), ThrottleDecision::Proceed);
        }
    }

    #[test]
    fn test_delay_grows_per_excess_request() {
        let throttle = throttle(10, 2, 1000);
        assert_eq!(throttle.register(), ThrottleDecision::Proceed);
        assert_eq!(throttle.register(), ThrottleDecision::Proceed);
        assert_eq!(
            throttle.register(),
            ThrottleDecision::Delay(Duration::from_millis(1000))
        );
        assert_eq!(
            throttle.register(),
            ThrottleDecision::Delay(Duration::from_millis(2000))
        );
    }

    #[test]
    fn test_exceeding_max_rejects() {
        let throttle = throttle(3, 3, 1000);
        for _ in 0..3 {
            assert_eq!(throttle.register(), ThrottleDecision::Proceed);
        }
        assert_eq!(throttle.register(), ThrottleDecision::Reject);
        assert_eq!(throttle.register(), ThrottleDecision::Reject);
    }

    #[test]
    fn test_window_expiry_resets_counting() {
        let throttle = throttle(2, 2, 1000);
        let start = Instant::now();
        assert_eq!(throttle.register_at(start), ThrottleDecision::Proceed);
        assert_eq!(throttle.register_at(start), ThrottleDecision::Proceed);
        assert_eq!(throttle.register_at(start), ThrottleDecision::Reject);

        // A full window later the counter starts over
        let later = start + Duration::from_secs(61);
        assert_eq!(throttle.register_at(later), ThrottleDecision::Proceed);
    }

    #[test]
    fn test_default_config_matches_reference_limits() {
        let config = ThrottleConfig::default();
        assert_eq!(config.window_secs, 60);
        assert_eq!(config.max_requests, 500);
        assert_eq!(config.delay_after, 500);
        assert_eq!(config.delay_ms, 1000);
    }
}
