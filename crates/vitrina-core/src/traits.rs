use std::future::Future;

use crate::error::ScrapeError;

/// External document-fetch capability: retrieves and renders one URL into
/// raw HTML. Implementations map their transport failures onto
/// [`ScrapeError`] (timeouts, connection failures, non-success statuses);
/// everything above this trait assumes classified errors.
pub trait PageFetcher: Send + Sync + Clone {
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<String, ScrapeError>> + Send;
}
