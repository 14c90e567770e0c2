use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

/// Engine configuration. Ranges are validated once, at engine construction;
/// every component downstream assumes the values are in range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Concurrent fetches in flight, and admissions per rolling second. 1..=10.
    pub max_concurrency: usize,

    /// Deadline applied to each fetch attempt, in milliseconds. 10_000..=60_000.
    pub request_deadline_ms: u64,

    /// Retries after the initial attempt. 0..=5.
    pub retry_attempts: u32,

    /// Base backoff delay between attempts, in seconds. 0.5..=10.0.
    pub delay_between_requests_s: f64,

    /// Cache entry lifetime, in seconds.
    pub cache_ttl_s: u64,

    /// Run the rendering browser headless.
    pub headless: bool,

    /// User agent sent with every request. At most 200 characters.
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 3,
            request_deadline_ms: 30_000,
            retry_attempts: 2,
            delay_between_requests_s: 1.0,
            cache_ttl_s: 3600,
            headless: true,
            user_agent: "Mozilla/5.0 (compatible; Vitrina/0.2; +https://example.invalid/vitrina)"
                .to_string(),
        }
    }
}

impl ScrapeConfig {
    pub fn with_max_concurrency(mut self, n: usize) -> Self {
        self.max_concurrency = n;
        self
    }

    pub fn with_request_deadline(mut self, deadline: Duration) -> Self {
        self.request_deadline_ms = deadline.as_millis() as u64;
        self
    }

    pub fn with_retry_attempts(mut self, n: u32) -> Self {
        self.retry_attempts = n;
        self
    }

    pub fn with_delay_between_requests(mut self, seconds: f64) -> Self {
        self.delay_between_requests_s = seconds;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl_s = ttl.as_secs();
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    /// Reject out-of-range settings. The only error the engine raises outside
    /// of per-job failures.
    pub fn validate(&self) -> Result<(), ScrapeError> {
        if !(1..=10).contains(&self.max_concurrency) {
            return Err(ScrapeError::Config(format!(
                "max_concurrency must be 1..=10, got {}",
                self.max_concurrency
            )));
        }
        if !(10_000..=60_000).contains(&self.request_deadline_ms) {
            return Err(ScrapeError::Config(format!(
                "request_deadline_ms must be 10000..=60000, got {}",
                self.request_deadline_ms
            )));
        }
        if self.retry_attempts > 5 {
            return Err(ScrapeError::Config(format!(
                "retry_attempts must be 0..=5, got {}",
                self.retry_attempts
            )));
        }
        if !(0.5..=10.0).contains(&self.delay_between_requests_s) {
            return Err(ScrapeError::Config(format!(
                "delay_between_requests_s must be 0.5..=10.0, got {}",
                self.delay_between_requests_s
            )));
        }
        if self.user_agent.chars().count() > 200 {
            return Err(ScrapeError::Config("user_agent too long".into()));
        }
        Ok(())
    }

    pub fn request_deadline(&self) -> Duration {
        Duration::from_millis(self.request_deadline_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_s)
    }

    /// Backoff before attempt `n + 1`: `delay_between_requests × 2^n`.
    /// Uncapped; the retry ceiling bounds it in practice.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        Duration::from_secs_f64(self.delay_between_requests_s * f64::from(1u32 << attempt))
    }

    /// Jobs submitted together so progress can be reported incrementally.
    pub fn chunk_size(&self) -> usize {
        (self.max_concurrency * 2).min(20)
    }
}
