//! Research tool trait and the outputs it produces.
//!
//! A research tool turns a plan and a query into retrieved source content,
//! keyed by the URL it came from.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::error::Result;

/// Whether a source's content was actually retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ContentStatus {
    /// The content is text extracted from the source.
    Retrieved,
    /// A transport failure happened; the content is an error description.
    Degraded { reason: String },
}

/// Content extracted from one source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceContent {
    pub content: String,
    pub status: ContentStatus,
}

/// Source URL → extracted content.
///
/// A web search produces exactly one entry per run; the loop replaces the
/// whole value every iteration instead of merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolOutputs {
    entries: BTreeMap<String, SourceContent>,
}

impl ToolOutputs {
    /// One successfully retrieved source.
    pub fn single(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self::from_entry(url.into(), SourceContent {
            content: content.into(),
            status: ContentStatus::Retrieved,
        })
    }

    /// One source whose retrieval failed. `message` stands in as its content.
    pub fn degraded(url: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::from_entry(url.into(), SourceContent {
            content: message.clone(),
            status: ContentStatus::Degraded { reason: message },
        })
    }

    fn from_entry(url: String, source: SourceContent) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(url, source);
        Self { entries }
    }

    /// Flag every entry as degraded while keeping its content.
    ///
    /// Entries that are already degraded keep their original reason.
    pub fn mark_degraded(&mut self, reason: &str) {
        for source in self.entries.values_mut() {
            if source.status == ContentStatus::Retrieved {
                source.status = ContentStatus::Degraded {
                    reason: reason.to_string(),
                };
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, url: &str) -> Option<&SourceContent> {
        self.entries.get(url)
    }

    /// Source URLs, in key order.
    pub fn links(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// True if any entry carries an error description instead of content.
    pub fn is_degraded(&self) -> bool {
        self.entries
            .values()
            .any(|s| matches!(s.status, ContentStatus::Degraded { .. }))
    }

    /// Render for inclusion in an agent prompt: each source URL followed by
    /// its content.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(url, source)| format!("Source: {url}\n{}", source.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// The core ResearchTool trait.
///
/// The loop calls `run()` once per iteration; `description()` is shown to the
/// planning agent so it knows what the tool can do.
#[async_trait]
pub trait ResearchTool: Send + Sync {
    /// The unique name of this tool (e.g., "web_search").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the planner).
    fn description(&self) -> &str;

    /// Retrieve content relevant to `plan` and `query`.
    ///
    /// Transport failures are reported as degraded entries, not errors.
    /// An `Err` means the run cannot continue.
    async fn run(&self, plan: &str, query: &str) -> Result<ToolOutputs>;
}
