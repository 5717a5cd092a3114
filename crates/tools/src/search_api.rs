//! Search API client (Serper-compatible).
//!
//! Posts `{"q": query}` and renders the organic results as plain-text blocks
//! for the page-selection prompt. Transport and response-shape failures are
//! not errors: they come back as a human-readable string with a degraded
//! status, and the pipeline carries on with it.

use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use webscout_config::SearchConfig;
use webscout_core::tool::ContentStatus;

/// Literal returned when the response carries no `organic` array.
pub const NO_ORGANIC_RESULTS: &str = "No organic results found.";

/// Formatted search results, or a description of why there are none.
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub text: String,
    pub status: ContentStatus,
}

impl SearchResults {
    fn ok(text: String) -> Self {
        Self {
            text,
            status: ContentStatus::Retrieved,
        }
    }

    fn failed(text: String) -> Self {
        warn!(reason = %text, "Search API call degraded");
        Self {
            status: ContentStatus::Degraded {
                reason: text.clone(),
            },
            text,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.status, ContentStatus::Degraded { .. })
    }
}

/// One organic search hit. Every field is optional on the wire and may hold
/// any JSON value; non-strings are rendered from their JSON text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrganicResult {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub link: Option<Value>,
    #[serde(default)]
    pub snippet: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Option<Vec<OrganicResult>>,
}

pub struct SearchApiClient {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl SearchApiClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            endpoint: endpoint.into(),
            api_key,
            client,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(&config.endpoint, config.api_key.clone(), config.timeout_secs)
    }

    /// Run `query` against the search API.
    pub async fn search(&self, query: &str) -> SearchResults {
        let Some(api_key) = self.api_key.as_deref() else {
            return SearchResults::failed(
                "Key error in handling response: search API key is not configured".into(),
            );
        };

        debug!(endpoint = %self.endpoint, query = %query, "Fetching search results");

        let response = match self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", api_key)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "q": query }))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return SearchResults::failed(format!("Request exception occurred: {e}")),
        };

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(e) => return SearchResults::failed(format!("HTTP error occurred: {e}")),
        };

        let body: serde_json::Value = match response.json().await {
            Ok(body) => body,
            Err(e) => return SearchResults::failed(format!("Request exception occurred: {e}")),
        };

        match serde_json::from_value::<SearchResponse>(body) {
            Ok(SearchResponse { organic: Some(results) }) => SearchResults::ok(format_results(&results)),
            Ok(SearchResponse { organic: None }) => SearchResults::ok(NO_ORGANIC_RESULTS.into()),
            Err(e) => SearchResults::failed(format!("Key error in handling response: {e}")),
        }
    }
}

/// Render results as `Title`/`Link`/`Snippet` blocks separated by `---`.
pub fn format_results(results: &[OrganicResult]) -> String {
    results
        .iter()
        .map(|r| {
            format!(
                "Title: {}\nLink: {}\nSnippet: {}\n---",
                field_text(r.title.as_ref(), "No Title"),
                field_text(r.link.as_ref(), "#"),
                field_text(r.snippet.as_ref(), "No snippet available."),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn field_text(value: Option<&Value>, fallback: &str) -> String {
    match value {
        None | Some(Value::Null) => fallback.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
