//! Aggregated outcome counters for batches and for the engine itself.

use std::time::Duration;

use serde::Serialize;

/// Per-batch outcome summary. Accumulated while the batch runs and
/// finalized with the wall-clock elapsed time once it completes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchStats {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub elapsed_ms: u64,
    pub avg_response_ms: f64,
    pub throughput_per_s: f64,
    #[serde(skip)]
    response_time_total: Duration,
}

impl BatchStats {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// A job that missed the cache and went through fetch and extraction
    /// successfully.
    pub fn record_success(&mut self, response_time: Duration) {
        self.succeeded += 1;
        self.cache_misses += 1;
        self.response_time_total += response_time;
    }

    /// A job served straight from cache. Counts as a success without
    /// contributing to response-time averages.
    pub fn record_cache_hit(&mut self) {
        self.succeeded += 1;
        self.cache_hits += 1;
    }

    /// A job that missed the cache and failed terminally.
    pub fn record_failure(&mut self) {
        self.failed += 1;
        self.cache_misses += 1;
    }

    /// Completed jobs so far, both outcomes.
    pub fn completed(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn success_rate(&self) -> f64 {
        self.succeeded as f64 / self.completed().max(1) as f64 * 100.0
    }

    pub(crate) fn response_time_total(&self) -> Duration {
        self.response_time_total
    }

    /// Derive the averages once the batch is done.
    pub fn finalize(&mut self, elapsed: Duration) {
        self.elapsed_ms = elapsed.as_millis() as u64;
        let fetched = self.succeeded.saturating_sub(self.cache_hits);
        self.avg_response_ms = if fetched > 0 {
            self.response_time_total.as_secs_f64() * 1000.0 / fetched as f64
        } else {
            0.0
        };
        self.throughput_per_s = if elapsed > Duration::ZERO {
            self.completed() as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
    }
}

/// Cumulative counters the engine keeps across batches.
#[derive(Debug, Default)]
pub(crate) struct EngineTotals {
    pub jobs: u64,
    pub succeeded: u64,
    pub failed: u64,
    /// Jobs that actually fetched, the denominator for response averages.
    pub fetched: u64,
    pub response_time_total: Duration,
    /// Wall-clock time spent inside batches.
    pub busy_time: Duration,
}

impl EngineTotals {
    pub fn absorb(&mut self, batch: &BatchStats) {
        self.jobs += batch.completed() as u64;
        self.succeeded += batch.succeeded as u64;
        self.failed += batch.failed as u64;
        self.fetched += batch.succeeded.saturating_sub(batch.cache_hits) as u64;
        self.response_time_total += batch.response_time_total();
        self.busy_time += Duration::from_millis(batch.elapsed_ms);
    }
}

/// Point-in-time view of engine-level state across batches.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub total_jobs: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub success_rate: f64,
    pub avg_response_ms: f64,
    pub throughput_per_s: f64,
    pub cache_hit_rate: f64,
    pub cache_entries: usize,
    pub blacklist_size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_computes_averages_over_fetched_jobs_only() {
        let mut stats = BatchStats::new(4);
        stats.record_success(Duration::from_millis(100));
        stats.record_success(Duration::from_millis(300));
        stats.record_cache_hit();
        stats.record_failure();
        stats.finalize(Duration::from_secs(2));

        assert_eq!(stats.completed(), 4);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.cache_misses, 3);
        assert!((stats.avg_response_ms - 200.0).abs() < 1e-9);
        assert!((stats.throughput_per_s - 2.0).abs() < 1e-9);
        assert!((stats.success_rate() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn totals_accumulate_across_batches() {
        let mut first = BatchStats::new(2);
        first.record_success(Duration::from_millis(100));
        first.record_failure();
        first.finalize(Duration::from_secs(1));

        let mut second = BatchStats::new(1);
        second.record_cache_hit();
        second.finalize(Duration::from_secs(1));

        let mut totals = EngineTotals::default();
        totals.absorb(&first);
        totals.absorb(&second);

        assert_eq!(totals.jobs, 3);
        assert_eq!(totals.succeeded, 2);
        assert_eq!(totals.failed, 1);
        assert_eq!(totals.fetched, 1);
        assert_eq!(totals.response_time_total, Duration::from_millis(100));
        assert_eq!(totals.busy_time, Duration::from_secs(2));
    }

    #[test]
    fn empty_batch_finalizes_without_dividing_by_zero() {
        let mut stats = BatchStats::new(0);
        stats.finalize(Duration::ZERO);
        assert_eq!(stats.avg_response_ms, 0.0);
        assert_eq!(stats.throughput_per_s, 0.0);
        assert_eq!(stats.success_rate(), 0.0);
    }
}
