//! Web search tool: query generation, search, page selection, scrape.
//!
//! One `run` performs four sequential steps:
//!
//! 1. Ask the model (forced function call) for the best search-engine query.
//! 2. Fetch organic results from the search API.
//! 3. Ask the model (forced function call) to pick one result URL.
//! 4. Scrape that URL down to its visible text.
//!
//! Steps 1 and 3 are fatal on failure. Steps 2 and 4 degrade: their error
//! text flows on as content and the outputs are marked degraded.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use webscout_config::AppConfig;
use webscout_core::completion::{FunctionSpec, StructuredCompletion};
use webscout_core::error::Result;
use webscout_core::provider::Provider;
use webscout_core::tool::{ResearchTool, ToolOutputs};

use crate::scrape::PageScraper;
use crate::search_api::SearchApiClient;

pub const GENERATE_QUERY: FunctionSpec = FunctionSpec {
    name: "fetch_search_results",
    description: "Fetch search results based on the search query",
    field: "search_engine_queries",
    field_description: "The most suitable search query for the plan",
};

pub const SELECT_PAGE: FunctionSpec = FunctionSpec {
    name: "decide_best_pages",
    description: "Decide the best pages to visit based on the search results",
    field: "best_search_page",
    field_description: "The URL link of best search page based on the Search Results, Plan and Query. Do not select pdf files.",
};

const DESCRIPTION: &str = "\
Web search tool. Given a plan and a query it generates a search-engine query, \
fetches the organic search results, picks the single most relevant page \
(never a PDF) and returns that page's visible text keyed by its URL.";

pub struct WebSearchTool {
    structured: StructuredCompletion,
    search: SearchApiClient,
    scraper: PageScraper,
}

impl WebSearchTool {
    pub fn new(structured: StructuredCompletion, search: SearchApiClient, scraper: PageScraper) -> Self {
        Self {
            structured,
            search,
            scraper,
        }
    }

    /// Wire the tool from the loaded configuration.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self::new(
            StructuredCompletion::new(provider, config.model.clone()),
            SearchApiClient::from_config(&config.search),
            PageScraper::from_config(&config.scraper),
        )
    }

    async fn generate_query(&self, plan: &str, query: &str) -> Result<String> {
        let prompt = format!("Query:{query}\n\n Plan:{plan}");
        let search_query = self.structured.extract_field(&GENERATE_QUERY, &prompt).await?;
        debug!(search_query = %search_query, "Generated search query");
        Ok(search_query)
    }

    async fn select_page(&self, results: &str, plan: &str, query: &str) -> Result<String> {
        let prompt = format!("Query:{query}\n\n Plan:{plan} \n\n Search Results:{results}");
        let url = self.structured.extract_field(&SELECT_PAGE, &prompt).await?;
        let url = url.trim().to_string();
        debug!(url = %url, "Selected best page");
        Ok(url)
    }
}

#[async_trait]
impl ResearchTool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    async fn run(&self, plan: &str, query: &str) -> Result<ToolOutputs> {
        let search_query = self.generate_query(plan, query).await?;
        let results = self.search.search(&search_query).await;
        let url = self.select_page(&results.text, plan, query).await?;

        let mut outputs = self.scraper.scrape(&url).await;
        if results.is_degraded() {
            outputs.mark_degraded("search results unavailable; page chosen from an error message");
        }

        info!(url = %url, degraded = outputs.is_degraded(), "Web search complete");
        Ok(outputs)
    }
}
