use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use vitrina_core::config::ScrapeConfig;
use vitrina_core::error::ScrapeError;
use vitrina_core::traits::PageFetcher;

/// Chromium-backed fetcher using the Chrome DevTools Protocol.
///
/// Unlike [`super::HttpPageFetcher`], this renders JavaScript before
/// returning the HTML, which is what product pages built on client-side
/// frameworks need. A single Chromium process is shared across all clones
/// of this struct; each fetch opens a new tab, grabs the rendered DOM, and
/// closes the tab.
#[derive(Clone)]
pub struct BrowserPageFetcher {
    browser: Arc<Browser>,
    timeout: Duration,
}

impl BrowserPageFetcher {
    /// Launches a Chromium instance honoring the config's headless flag,
    /// User-Agent, and per-request deadline.
    ///
    /// Requires a Chromium / Chrome binary reachable via `$PATH` (or the
    /// default locations checked by `chromiumoxide`).
    pub async fn new(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        let mut builder = BrowserConfig::builder();
        builder = builder.no_sandbox().disable_default_args();

        if !config.headless {
            builder = builder.with_head();
        }

        // Snap-packaged Chromium exposes a wrapper that rejects standard
        // Chrome CLI flags. Locate the real binary where we can, falling
        // back to chromiumoxide's own lookup.
        if let Some(bin) = Self::find_chrome_binary() {
            tracing::info!("Using Chrome binary: {}", bin.display());
            builder = builder.chrome_executable(bin);
        }

        if config.headless {
            builder = builder.arg("--headless=new");
        }
        let browser_config = builder
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-popup-blocking")
            .arg("--disable-translate")
            .arg("--no-first-run")
            .arg(format!("--user-agent={}", config.user_agent))
            .build()
            .map_err(|e| ScrapeError::Config(format!("Browser config error: {e}")))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScrapeError::Network(format!("Failed to launch browser: {e}")))?;

        // The CDP handler must be polled continuously for the connection to work.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    tracing::warn!("Browser CDP handler error: {event:?}");
                    break;
                }
            }
        });

        Ok(Self {
            browser: Arc::new(browser),
            timeout: config.request_deadline(),
        })
    }

    /// Tries to locate the real Chrome/Chromium binary, honoring an
    /// explicit `CHROME_BIN` override first. Returns `None` to let
    /// `chromiumoxide` do its own lookup.
    fn find_chrome_binary() -> Option<PathBuf> {
        if let Ok(p) = std::env::var("CHROME_BIN") {
            let path = PathBuf::from(&p);
            if path.exists() {
                return Some(path);
            }
        }

        let candidates: &[&str] = &[
            "/snap/chromium/current/usr/lib/chromium-browser/chrome",
            "/var/lib/flatpak/exports/bin/org.chromium.Chromium",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/google-chrome",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
        ];
        candidates.iter().map(PathBuf::from).find(|p| p.exists())
    }
}

impl PageFetcher for BrowserPageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        let result = tokio::time::timeout(self.timeout, async {
            let page = self
                .browser
                .new_page(url)
                .await
                .map_err(|e| ScrapeError::Network(format!("Failed to navigate to {url}: {e}")))?;

            // <body> present is the minimal signal that the page rendered
            // its main content.
            page.find_element("body")
                .await
                .map_err(|e| ScrapeError::Network(format!("Page did not render body: {e}")))?;

            let html = page
                .content()
                .await
                .map_err(|e| ScrapeError::Network(format!("Failed to read page content: {e}")))?;

            // Close the tab to free browser resources.
            let _ = page.close().await;

            Ok::<String, ScrapeError>(html)
        })
        .await;

        match result {
            Ok(inner) => inner,
            Err(_) => Err(ScrapeError::Timeout(self.timeout.as_secs())),
        }
    }
}
