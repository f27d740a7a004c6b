use std::sync::Mutex;
use reqwest::Response;

use crate::models::RateLimitWindow;

/// Remembers the quota GitHub reported on the latest response.
///
/// The collector never waits on it: pacing is a fixed delay per candidate.
/// The snapshot only feeds diagnostics.
pub struct RateLimitTracker {
    state: Mutex<Option<RateLimitWindow>>,
}

impl RateLimitTracker {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }

    pub fn update_from_response(&self, response: &Response) {
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        let remaining = header("x-ratelimit-remaining").and_then(|v| v.parse::<u32>().ok());
        let Some(remaining) = remaining else {
            return;
        };
        let limit = header("x-ratelimit-limit")
            .and_then(|v| v.parse().ok())
            .unwrap_or(remaining);
        let reset = header("x-ratelimit-reset")
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        self.record(RateLimitWindow {
            limit,
            remaining,
            reset,
        });
    }

    pub fn record(&self, window: RateLimitWindow) {
        if let Ok(mut state) = self.state.lock() {
            if window.remaining < 100 {
                tracing::warn!(
                    "GitHub API quota running low: {}/{} remaining",
                    window.remaining,
                    window.limit
                );
            }
            *state = Some(window);
        }
    }

    pub fn snapshot(&self) -> Option<RateLimitWindow> {
        self.state.lock().ok().and_then(|s| *s)
    }
}

impl Default for RateLimitTracker {
    fn default() -> Self {
        Self::new()
    }
}
