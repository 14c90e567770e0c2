//! Bounded retry with exponential backoff and a session-scoped blacklist.
//!
//! Per-job state machine: an attempt either succeeds, fails retryably and
//! is retried after backoff while attempts remain, or becomes terminal. A
//! non-retryable failure is terminal immediately, whatever the attempt
//! budget. Terminal URLs go on the blacklist for the rest of the process;
//! re-encountering one short-circuits to the prior failure without fetching.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::ScrapeConfig;
use crate::error::{FailureRecord, ScrapeError};
use crate::extract;
use crate::fetch::ContentFetcher;
use crate::record::{Job, ProductRecord};
use crate::traits::PageFetcher;

/// URLs that reached terminal failure this session, with the failure that
/// ended them. Shared across all concurrent jobs of one engine instance.
#[derive(Clone, Default)]
pub struct Blacklist {
    inner: Arc<Mutex<HashMap<String, FailureRecord>>>,
}

impl Blacklist {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_inner(&self) -> MutexGuard<'_, HashMap<String, FailureRecord>> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Recovered blacklist from poisoned mutex");
            poisoned.into_inner()
        })
    }

    pub fn get(&self, url: &str) -> Option<FailureRecord> {
        self.lock_inner().get(url).cloned()
    }

    pub fn insert(&self, url: &str, failure: FailureRecord) {
        self.lock_inner().insert(url.to_string(), failure);
    }

    pub fn len(&self) -> usize {
        self.lock_inner().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Executes one job end to end: fetch, extract, validate, with retries.
#[derive(Clone)]
pub struct RetryCoordinator<F: PageFetcher> {
    fetcher: ContentFetcher<F>,
    config: ScrapeConfig,
    blacklist: Blacklist,
}

impl<F: PageFetcher> RetryCoordinator<F> {
    pub fn new(fetcher: ContentFetcher<F>, config: ScrapeConfig, blacklist: Blacklist) -> Self {
        Self {
            fetcher,
            config,
            blacklist,
        }
    }

    pub fn blacklist(&self) -> &Blacklist {
        &self.blacklist
    }

    /// Run one job to success or terminal failure.
    pub async fn run(&self, job: &Job) -> Result<ProductRecord, FailureRecord> {
        if let Some(prior) = self.blacklist.get(&job.url) {
            tracing::warn!(url = %job.url, "Skipping blacklisted URL");
            return Err(prior);
        }

        let max_attempts = self.config.retry_attempts + 1;
        let mut attempt: u32 = 0;
        loop {
            match self.attempt_once(job).await {
                Ok(record) => {
                    tracing::info!(
                        product_id = %job.product_id,
                        attempt = attempt + 1,
                        "Job succeeded"
                    );
                    return Ok(record);
                }
                Err(err) if err.is_retryable() && attempt + 1 < max_attempts => {
                    let delay = self.config.backoff_delay(attempt);
                    tracing::warn!(
                        product_id = %job.product_id,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Retrying after failure"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    let failure = FailureRecord::from_error(&err, job, attempt + 1);
                    tracing::error!(
                        product_id = %job.product_id,
                        kind = %failure.kind,
                        attempts = attempt + 1,
                        error = %err,
                        "Job failed terminally"
                    );
                    self.blacklist.insert(&job.url, failure.clone());
                    return Err(failure);
                }
            }
        }
    }

    /// One attempt: fetch into a document, run the extraction pipeline,
    /// validate the merged record.
    async fn attempt_once(&self, job: &Job) -> Result<ProductRecord, ScrapeError> {
        let document = self.fetcher.fetch(&job.url).await?;
        let record = extract::extract(Arc::new(document), &job.product_id).await;
        record.validated()
    }
}
