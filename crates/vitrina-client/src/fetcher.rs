use reqwest::Client;
use vitrina_core::config::ScrapeConfig;
use vitrina_core::error::ScrapeError;
use vitrina_core::traits::PageFetcher;

/// Plain HTTP fetcher using reqwest.
///
/// Downloads raw HTML with the configured User-Agent and timeout. Suitable
/// for server-rendered pages; use the browser fetcher when the page needs
/// JavaScript to produce its content. URLs are assumed to come from a
/// pre-validated catalog, so no target filtering happens here.
#[derive(Clone)]
pub struct HttpPageFetcher {
    client: Client,
    timeout_secs: u64,
}

impl HttpPageFetcher {
    pub fn new(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        let timeout = config.request_deadline();
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(timeout)
            .build()
            .map_err(|e| ScrapeError::Config(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            client,
            timeout_secs: timeout.as_secs(),
        })
    }
}

impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ScrapeError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                ScrapeError::Network(format!("Connection failed: {e}"))
            } else {
                ScrapeError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| ScrapeError::Network(format!("Failed to read response body: {e}")))
    }
}
