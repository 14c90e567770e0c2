//! Admission control for fetch jobs.
//!
//! The gate is the only component allowed to throttle: it bounds how many
//! jobs run at once and caps new admissions to the same bound per rolling
//! second. Everything past the gate assumes unconstrained execution.

use std::num::NonZeroU32;
use std::sync::Arc;

use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Holds one concurrency slot for the duration of a job's execution.
/// Dropping it releases the slot; the rate token it consumed is never
/// returned early.
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

/// Concurrency bound plus admission-rate cap shared by all in-flight jobs.
#[derive(Clone)]
pub struct FetchGate {
    semaphore: Arc<Semaphore>,
    limiter: Arc<DirectRateLimiter>,
}

impl FetchGate {
    /// `max_concurrency` bounds both the in-flight count and the admissions
    /// per second. Callers validate the range; a zero is clamped to one
    /// rather than panicking.
    pub fn new(max_concurrency: usize) -> Self {
        let rate = u32::try_from(max_concurrency)
            .ok()
            .and_then(NonZeroU32::new)
            .unwrap_or(nonzero!(1u32));
        let quota = Quota::per_second(rate).allow_burst(rate);
        Self {
            semaphore: Arc::new(Semaphore::new(rate.get() as usize)),
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Block until both a concurrency slot and a rate token are available.
    /// A delayed admission is scheduling, not failure; this never errors.
    pub async fn admit(&self) -> GatePermit {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("gate semaphore is never closed");
        self.limiter.until_ready().await;
        GatePermit { _permit: permit }
    }

    /// Free slots right now, for observability and tests.
    pub fn available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }
}
