//! Batch orchestration: cache lookups, gated execution, aggregation.
//!
//! The engine owns the cache, the admission gate and the retry coordinator
//! and fans a job list out in chunks. Per-job failures are terminal records,
//! never panics, so one bad page cannot take down a batch.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::cache::ResultCache;
use crate::config::ScrapeConfig;
use crate::error::{FailureRecord, ScrapeError};
use crate::fetch::ContentFetcher;
use crate::gate::FetchGate;
use crate::record::{Job, ProductRecord};
use crate::retry::{Blacklist, RetryCoordinator};
use crate::stats::{BatchStats, EngineStats, EngineTotals};
use crate::traits::PageFetcher;

/// Lifecycle notifications emitted while a batch runs.
pub enum BatchEvent<'a> {
    BatchStarted {
        total: usize,
    },
    CacheHit {
        job: &'a Job,
    },
    JobSucceeded {
        job: &'a Job,
        response_time: Duration,
    },
    JobFailed {
        job: &'a Job,
        failure: &'a FailureRecord,
    },
    Progress {
        completed: usize,
        total: usize,
    },
    BatchCancelled {
        completed: usize,
        total: usize,
    },
    BatchCompleted {
        stats: &'a BatchStats,
    },
}

/// Receives batch events. The default implementation ignores them, so
/// tests and embedders only handle what they care about.
pub trait BatchReporter: Send + Sync {
    fn report(&self, event: BatchEvent<'_>) {
        let _ = event;
    }
}

/// Reporter that forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingBatchReporter;

impl BatchReporter for TracingBatchReporter {
    fn report(&self, event: BatchEvent<'_>) {
        match event {
            BatchEvent::BatchStarted { total } => {
                tracing::info!(total, "Batch started");
            }
            BatchEvent::CacheHit { job } => {
                tracing::debug!(product_id = %job.product_id, "Served from cache");
            }
            BatchEvent::JobSucceeded { job, response_time } => {
                tracing::info!(
                    product_id = %job.product_id,
                    response_ms = response_time.as_millis() as u64,
                    "Job succeeded"
                );
            }
            BatchEvent::JobFailed { job, failure } => {
                tracing::warn!(
                    product_id = %job.product_id,
                    kind = %failure.kind,
                    attempts = failure.attempt,
                    "Job failed"
                );
            }
            BatchEvent::Progress { completed, total } => {
                tracing::info!(completed, total, "Batch progress");
            }
            BatchEvent::BatchCancelled { completed, total } => {
                tracing::warn!(completed, total, "Batch cancelled");
            }
            BatchEvent::BatchCompleted { stats } => {
                tracing::info!(
                    succeeded = stats.succeeded,
                    failed = stats.failed,
                    cache_hits = stats.cache_hits,
                    elapsed_ms = stats.elapsed_ms,
                    "Batch completed"
                );
            }
        }
    }
}

/// How often a progress event fires, in completed jobs.
const PROGRESS_INTERVAL: usize = 10;

/// Everything a finished batch hands back: the extracted records keyed by
/// product identifier (successes only, cache hits included) and the
/// outcome counters. Terminal failures appear in the counters and on the
/// blacklist, not here.
pub struct BatchOutcome {
    pub results: HashMap<String, ProductRecord>,
    pub stats: BatchStats,
}

enum JobOutcome {
    CacheHit(ProductRecord),
    Fetched {
        record: ProductRecord,
        response_time: Duration,
    },
    Failed,
}

/// Runs job batches end to end against a [`PageFetcher`] implementation.
pub struct ScrapeEngine<F: PageFetcher> {
    config: ScrapeConfig,
    cache: ResultCache,
    gate: FetchGate,
    retry: RetryCoordinator<F>,
    totals: Mutex<EngineTotals>,
}

impl<F: PageFetcher> std::fmt::Debug for ScrapeEngine<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrapeEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<F: PageFetcher> ScrapeEngine<F> {
    /// Validates the config and wires the cache, gate and retry layers.
    pub fn new(config: ScrapeConfig, fetcher: F) -> Result<Self, ScrapeError> {
        config.validate()?;
        let content = ContentFetcher::new(fetcher, config.request_deadline());
        let retry = RetryCoordinator::new(content, config.clone(), Blacklist::new());
        Ok(Self {
            gate: FetchGate::new(config.max_concurrency),
            cache: ResultCache::new(),
            retry,
            config,
            totals: Mutex::new(EngineTotals::default()),
        })
    }

    fn lock_totals(&self) -> MutexGuard<'_, EngineTotals> {
        self.totals.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Recovered engine totals from poisoned mutex");
            poisoned.into_inner()
        })
    }

    /// Process every job, in chunks sized to the concurrency limit.
    /// Cancellation stops new chunks from being submitted; jobs already
    /// in flight run to completion and are counted.
    pub async fn run_batch<R: BatchReporter>(
        &self,
        jobs: &[Job],
        cancel: &CancellationToken,
        reporter: &R,
    ) -> BatchOutcome {
        let started = Instant::now();
        let mut stats = BatchStats::new(jobs.len());
        let mut results = HashMap::new();
        reporter.report(BatchEvent::BatchStarted { total: jobs.len() });

        let mut last_progress = 0;
        for chunk in jobs.chunks(self.config.chunk_size()) {
            if cancel.is_cancelled() {
                reporter.report(BatchEvent::BatchCancelled {
                    completed: stats.completed(),
                    total: jobs.len(),
                });
                break;
            }

            let outcomes =
                futures::future::join_all(chunk.iter().map(|job| self.process_job(job, reporter)))
                    .await;
            for (job, outcome) in chunk.iter().zip(outcomes) {
                match outcome {
                    JobOutcome::CacheHit(record) => {
                        stats.record_cache_hit();
                        results.insert(job.product_id.clone(), record);
                    }
                    JobOutcome::Fetched {
                        record,
                        response_time,
                    } => {
                        stats.record_success(response_time);
                        results.insert(job.product_id.clone(), record);
                    }
                    JobOutcome::Failed => stats.record_failure(),
                }
            }

            while stats.completed() - last_progress >= PROGRESS_INTERVAL {
                last_progress += PROGRESS_INTERVAL;
                reporter.report(BatchEvent::Progress {
                    completed: last_progress,
                    total: jobs.len(),
                });
            }
        }

        stats.finalize(started.elapsed());
        self.lock_totals().absorb(&stats);
        reporter.report(BatchEvent::BatchCompleted { stats: &stats });
        BatchOutcome { results, stats }
    }

    /// Fetch and extract one product, bypassing the batch machinery.
    /// Cache and blacklist state still apply.
    pub async fn run_one(&self, job: &Job) -> Result<ProductRecord, FailureRecord> {
        let started = Instant::now();
        let mut stats = BatchStats::new(1);
        if let Some(record) = self.cache.get(&job.product_id) {
            stats.record_cache_hit();
            stats.finalize(started.elapsed());
            self.lock_totals().absorb(&stats);
            return Ok(record);
        }
        let _permit = self.gate.admit().await;
        let fetch_started = Instant::now();
        let result = self.retry.run(job).await;
        match &result {
            Ok(record) => {
                stats.record_success(fetch_started.elapsed());
                self.cache
                    .put(&job.product_id, record.clone(), self.config.cache_ttl());
            }
            Err(_) => stats.record_failure(),
        }
        stats.finalize(started.elapsed());
        self.lock_totals().absorb(&stats);
        result
    }

    async fn process_job<R: BatchReporter>(&self, job: &Job, reporter: &R) -> JobOutcome {
        if let Some(record) = self.cache.get(&job.product_id) {
            reporter.report(BatchEvent::CacheHit { job });
            return JobOutcome::CacheHit(record);
        }

        let _permit = self.gate.admit().await;
        let fetch_started = Instant::now();
        match self.retry.run(job).await {
            Ok(record) => {
                let response_time = fetch_started.elapsed();
                self.cache
                    .put(&job.product_id, record.clone(), self.config.cache_ttl());
                reporter.report(BatchEvent::JobSucceeded { job, response_time });
                JobOutcome::Fetched {
                    record,
                    response_time,
                }
            }
            Err(failure) => {
                reporter.report(BatchEvent::JobFailed {
                    job,
                    failure: &failure,
                });
                JobOutcome::Failed
            }
        }
    }

    /// Engine-level counters for dashboards and logs, cumulative across
    /// every batch and single job this engine has run.
    pub fn stats(&self) -> EngineStats {
        let totals = self.lock_totals();
        EngineStats {
            total_jobs: totals.jobs,
            succeeded: totals.succeeded,
            failed: totals.failed,
            success_rate: totals.succeeded as f64 / totals.jobs.max(1) as f64 * 100.0,
            avg_response_ms: if totals.fetched > 0 {
                totals.response_time_total.as_secs_f64() * 1000.0 / totals.fetched as f64
            } else {
                0.0
            },
            throughput_per_s: if totals.busy_time > Duration::ZERO {
                totals.jobs as f64 / totals.busy_time.as_secs_f64()
            } else {
                0.0
            },
            cache_hit_rate: self.cache.hit_rate(),
            cache_entries: self.cache.len(),
            blacklist_size: self.retry.blacklist().len(),
        }
    }

    /// Drop expired cache entries, returning how many were removed.
    pub fn sweep_cache(&self) -> usize {
        self.cache.sweep()
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }
}
