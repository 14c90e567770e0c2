//! Test doubles shared across the crate's unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::error::ScrapeError;
use crate::traits::PageFetcher;

/// Scripted [`PageFetcher`]. Queued responses are consumed in order; once
/// the queue is empty every further call gets a clone of the fallback.
/// Tracks call and in-flight counts so tests can assert on fetch volume
/// and on observed concurrency.
#[derive(Clone)]
pub struct MockPageFetcher {
    queued: Arc<Mutex<VecDeque<Result<String, ScrapeError>>>>,
    fallback: Arc<Result<String, ScrapeError>>,
    latency: Option<Duration>,
    calls: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockPageFetcher {
    /// Succeeds on every call with the given body.
    pub fn new(html: &str) -> Self {
        Self::with_fallback(Ok(html.to_string()))
    }

    /// Fails on every call with a clone of the given error.
    pub fn with_error(error: ScrapeError) -> Self {
        Self::with_fallback(Err(error))
    }

    /// Returns the scripted responses in order, then fails.
    pub fn with_responses(responses: Vec<Result<String, ScrapeError>>) -> Self {
        let mut mock = Self::with_fallback(Err(ScrapeError::Network(
            "mock response queue exhausted".into(),
        )));
        mock.queued = Arc::new(Mutex::new(responses.into()));
        mock
    }

    fn with_fallback(fallback: Result<String, ScrapeError>) -> Self {
        Self {
            queued: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Arc::new(fallback),
            latency: None,
            calls: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Delay every call by `latency` before responding.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn lock_queued(&self) -> MutexGuard<'_, VecDeque<Result<String, ScrapeError>>> {
        self.queued
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Total calls observed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously outstanding calls observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl PageFetcher for MockPageFetcher {
    async fn fetch_page(&self, _url: &str) -> Result<String, ScrapeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let response = self
            .lock_queued()
            .pop_front()
            .unwrap_or_else(|| self.fallback.as_ref().clone());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        response
    }
}
