//! Integration agent: drafts a cited answer from the plan and tool outputs.
//!
//! The draft doubles as feedback for the next planning round when the
//! checker rejects it.

use async_trait::async_trait;
use tracing::debug;
use webscout_core::completion::TextCompletion;
use webscout_core::error::Result;
use webscout_core::tool::ToolOutputs;

use crate::prompts;

#[async_trait]
pub trait Integrator: Send + Sync {
    async fn integrate(&self, query: &str, plan: &str, outputs: &ToolOutputs) -> Result<String>;
}

pub struct IntegrationAgent {
    completion: TextCompletion,
}

impl IntegrationAgent {
    pub fn new(completion: TextCompletion) -> Self {
        Self { completion }
    }
}

#[async_trait]
impl Integrator for IntegrationAgent {
    async fn integrate(&self, query: &str, plan: &str, outputs: &ToolOutputs) -> Result<String> {
        let system = prompts::integration_prompt(outputs, plan);
        let draft = self.completion.generate(query, &system).await?;
        debug!(chars = draft.len(), sources = outputs.len(), "Integration agent replied");
        Ok(draft)
    }
}
