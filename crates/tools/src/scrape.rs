//! Page scraper: fetches one URL and keeps only its visible text.
//!
//! Requests carry a browser-like header set. The body is parsed with
//! `scraper`; text under `script`, `style`, `noscript` and `template` is
//! dropped, every remaining line is trimmed, and blank lines are removed.
//!
//! Any transport failure (connect, timeout, non-2xx status, body read)
//! produces a one-entry [`ToolOutputs`] whose content is the error message.

use reqwest::header::{self, HeaderMap, HeaderValue};
use scraper::Html;
use std::time::Duration;
use tracing::{debug, warn};
use webscout_config::ScraperConfig;
use webscout_core::tool::ToolOutputs;

/// Elements whose text never reaches the reader.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

pub struct PageScraper {
    client: reqwest::Client,
}

impl PageScraper {
    pub fn new(timeout_secs: u64, user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .default_headers(browser_headers())
            .build()
            .unwrap_or_default();

        Self { client }
    }

    pub fn from_config(config: &ScraperConfig) -> Self {
        Self::new(config.timeout_secs, &config.user_agent)
    }

    /// Fetch `url` and return its cleaned text keyed by the URL.
    pub async fn scrape(&self, url: &str) -> ToolOutputs {
        debug!(url = %url, "Scraping page");

        match self.fetch(url).await {
            Ok(html) => {
                let text = extract_visible_text(&html);
                debug!(url = %url, chars = text.len(), "Scraped page");
                ToolOutputs::single(url, text)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Scrape failed");
                ToolOutputs::degraded(url, format!("Failed to retrieve content due to an error: {e}"))
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<String, reqwest::Error> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9",
        ),
    );
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(header::REFERER, HeaderValue::from_static("https://www.google.com/"));
    headers.insert(header::UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers
}

/// Visible text of an HTML document, one trimmed non-empty line per line.
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let raw = document
        .tree
        .root()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
            });
            (!hidden).then_some(&**text)
        })
        .collect::<Vec<_>>()
        .join("\n");

    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
