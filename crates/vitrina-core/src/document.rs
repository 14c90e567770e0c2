use scraper::{Html, Selector};

/// A fetched page reduced to owned strings so it can cross task boundaries.
///
/// `scraper::Html` is not `Send`, so the fetch stage extracts the pieces the
/// sub-extractors need up front; extractors that want selector access
/// re-parse `html` locally inside their own blocking task.
#[derive(Debug, Clone)]
pub struct Document {
    /// The URL the page was fetched from; base for relative image links.
    pub url: String,
    /// `<title>` text; checked for soft-failure phrases at the fetch stage.
    pub title: String,
    /// Visible text content of the whole document.
    pub text: String,
    /// The raw rendered HTML.
    pub html: String,
}

impl Document {
    /// Parse rendered HTML into an owned document.
    pub fn parse(url: &str, html: String) -> Self {
        let parsed = Html::parse_document(&html);

        let title = Selector::parse("title")
            .ok()
            .and_then(|sel| parsed.select(&sel).next())
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        let text = parsed
            .root_element()
            .text()
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            url: url.to_string(),
            title,
            text,
            html,
        }
    }
}
