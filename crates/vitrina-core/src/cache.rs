//! TTL-keyed store of previously extracted records.
//!
//! Reads never delete: an expired entry counts as a miss but stays in the
//! map until an explicit [`ResultCache::sweep`]. Writes always overwrite.
//! There is no single-flight coordination: two jobs racing on the same key
//! during the miss window may both fetch, with the last write winning.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::record::{CacheEntry, ProductRecord};

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    hits: u64,
    misses: u64,
}

/// Thread-safe in-memory record cache keyed by product identifier.
#[derive(Clone, Default)]
pub struct ResultCache {
    inner: Arc<Mutex<CacheInner>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_inner(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Recovered result cache from poisoned mutex");
            poisoned.into_inner()
        })
    }

    /// Look up a fresh record. Absent or expired entries count as a miss;
    /// expired entries are left in place for the next sweep.
    pub fn get(&self, key: &str) -> Option<ProductRecord> {
        let mut inner = self.lock_inner();
        match inner.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                let record = entry.record.clone();
                inner.hits += 1;
                tracing::debug!(%key, "Cache hit");
                Some(record)
            }
            _ => {
                inner.misses += 1;
                None
            }
        }
    }

    /// Store a record, replacing any previous entry for the key.
    pub fn put(&self, key: &str, record: ProductRecord, ttl: Duration) {
        let mut inner = self.lock_inner();
        inner
            .entries
            .insert(key.to_string(), CacheEntry::new(record, ttl));
    }

    /// Remove all expired entries, returning how many were dropped.
    pub fn sweep(&self) -> usize {
        let mut inner = self.lock_inner();
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_expired());
        let removed = before - inner.entries.len();
        tracing::info!(
            removed,
            remaining = inner.entries.len(),
            "Cache sweep completed"
        );
        removed
    }

    pub fn len(&self) -> usize {
        self.lock_inner().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(hits, misses)` counters since construction.
    pub fn counters(&self) -> (u64, u64) {
        let inner = self.lock_inner();
        (inner.hits, inner.misses)
    }

    /// Percentage of lookups served from cache.
    pub fn hit_rate(&self) -> f64 {
        let (hits, misses) = self.counters();
        hits as f64 / (hits + misses).max(1) as f64 * 100.0
    }
}
