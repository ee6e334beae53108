use std::time::{Duration, Instant};

use dashmap::DashMap;

const MAX_FAILURES: u32 = 5;
const WINDOW: Duration = Duration::from_secs(15 * 60);

/// Per-email login brute force limiter: 5 failures per 15 minutes.
pub struct LoginRateLimiter {
    /// email -> (failed_count, window_start)
    entries: DashMap<String, (u32, Instant)>,
    max_failures: u32,
    window: Duration,
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginRateLimiter {
    pub fn new() -> Self {
        Self::with_limits(MAX_FAILURES, WINDOW)
    }

    pub fn with_limits(max_failures: u32, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_failures,
            window,
        }
    }

    /// Err carries the seconds left in the window.
    /// Does NOT increment the counter; call `record_failure()` on a bad attempt.
    pub fn check(&self, email: &str) -> Result<(), u64> {
        let now = Instant::now();

        let Some(entry) = self.entries.get(&email.to_lowercase()) else {
            return Ok(());
        };
        let (count, start) = *entry.value();

        let elapsed = now.duration_since(start);
        if elapsed > self.window || count < self.max_failures {
            return Ok(());
        }

        Err(self.window.saturating_sub(elapsed).as_secs())
    }

    pub fn record_failure(&self, email: &str) {
        let now = Instant::now();

        let mut entry = self.entries.entry(email.to_lowercase()).or_insert((0, now));
        let (count, start) = entry.value_mut();

        if now.duration_since(*start) > self.window {
            *count = 1;
            *start = now;
        } else {
            *count += 1;
        }
    }

    /// Drop windows that have already expired.
    pub fn cleanup(&self) {
        let now = Instant::now();
        let window = self.window;
        self.entries
            .retain(|_, (_, start)| now.duration_since(*start) <= window);
    }

    pub fn tracked(&self) -> usize {
        self.entries.len()
    }
}
