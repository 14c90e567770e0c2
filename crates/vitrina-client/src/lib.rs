pub mod fetcher;

#[cfg(feature = "browser")]
pub mod browser;

pub use fetcher::HttpPageFetcher;

#[cfg(feature = "browser")]
pub use browser::BrowserPageFetcher;
