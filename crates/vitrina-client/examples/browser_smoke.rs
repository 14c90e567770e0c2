/// Smoke-test for `BrowserPageFetcher`.
///
/// Launches a headless Chromium, fetches <https://example.com>, and verifies
/// the rendered HTML contains the expected `<h1>`.
///
/// Run with:
///   cargo run --example browser_smoke --features browser
use vitrina_client::BrowserPageFetcher;
use vitrina_core::config::ScrapeConfig;
use vitrina_core::traits::PageFetcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("Launching headless browser…");
    let config = ScrapeConfig::default();
    let fetcher = BrowserPageFetcher::new(&config).await?;

    let url = "https://example.com";
    println!("Fetching {url} …");
    let html = fetcher.fetch_page(url).await?;

    assert!(
        html.contains("<h1>Example Domain</h1>"),
        "Expected <h1> not found in rendered HTML"
    );
    assert!(
        html.len() > 500,
        "HTML suspiciously short ({} bytes)",
        html.len()
    );

    println!("OK — got {} bytes of rendered HTML", html.len());
    Ok(())
}
