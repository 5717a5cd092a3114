//! Research tools for WebScout.
//!
//! The only tool is [`WebSearchTool`]: it turns a plan and a query into the
//! visible text of one web page. Its HTTP collaborators are usable on their
//! own: [`SearchApiClient`] for the search API and [`PageScraper`] for pages.

pub mod scrape;
pub mod search_api;
pub mod web_search;

pub use scrape::{PageScraper, extract_visible_text};
pub use search_api::{SearchApiClient, SearchResults};
pub use web_search::WebSearchTool;
