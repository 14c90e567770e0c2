use std::time::Duration;

use crate::document::Document;
use crate::error::ScrapeError;
use crate::traits::PageFetcher;

/// Title phrases that mark a transport-successful response as unusable.
/// Matching pages are reclassified as not-found so they are neither cached
/// nor retried.
const SOFT_FAILURE_TITLES: [&str; 4] = ["404", "not found", "página no encontrada", "error"];

/// Fetches and renders exactly one URL into a parsed [`Document`], or a
/// classified failure. Applies the configured per-attempt deadline on top
/// of whatever timeout the underlying fetcher carries.
#[derive(Clone)]
pub struct ContentFetcher<F: PageFetcher> {
    fetcher: F,
    deadline: Duration,
}

impl<F: PageFetcher> ContentFetcher<F> {
    pub fn new(fetcher: F, deadline: Duration) -> Self {
        Self { fetcher, deadline }
    }

    pub async fn fetch(&self, url: &str) -> Result<Document, ScrapeError> {
        let html = tokio::time::timeout(self.deadline, self.fetcher.fetch_page(url))
            .await
            .map_err(|_| ScrapeError::Timeout(self.deadline.as_secs()))??;

        tracing::debug!(%url, bytes = html.len(), "Fetched page");
        let document = Document::parse(url, html);

        if let Some(phrase) = soft_failure_signal(&document.title) {
            return Err(ScrapeError::SoftNotFound(format!(
                "page title {:?} matches {phrase:?}",
                document.title
            )));
        }

        Ok(document)
    }
}

fn soft_failure_signal(title: &str) -> Option<&'static str> {
    let title = title.to_lowercase();
    SOFT_FAILURE_TITLES
        .iter()
        .find(|phrase| title.contains(*phrase))
        .copied()
}
