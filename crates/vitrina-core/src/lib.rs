pub mod cache;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod gate;
pub mod record;
pub mod retry;
pub mod stats;
pub mod traits;

#[cfg(test)]
pub(crate) mod testutil;

pub use cache::ResultCache;
pub use config::ScrapeConfig;
pub use document::Document;
pub use engine::{BatchEvent, BatchOutcome, BatchReporter, ScrapeEngine, TracingBatchReporter};
pub use error::{FailureKind, FailureRecord, ScrapeError};
pub use record::{Job, ProductRecord};
pub use stats::{BatchStats, EngineStats};
pub use traits::PageFetcher;
