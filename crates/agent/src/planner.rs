//! Planning agent: refines a free-text plan each iteration.

use async_trait::async_trait;
use tracing::debug;
use webscout_core::completion::TextCompletion;
use webscout_core::error::Result;
use webscout_core::tool::ToolOutputs;

use crate::prompts;

/// What the planner knows going into an iteration.
///
/// Everything except the tool specs is `None` on the first iteration.
#[derive(Debug, Clone, Copy)]
pub struct PlanningContext<'a> {
    pub prior_plan: Option<&'a str>,
    pub prior_outputs: Option<&'a ToolOutputs>,
    pub feedback: Option<&'a str>,
    pub tool_specs: &'a str,
}

#[async_trait]
pub trait Planner: Send + Sync {
    async fn plan(&self, query: &str, context: PlanningContext<'_>) -> Result<String>;
}

pub struct PlanningAgent {
    completion: TextCompletion,
}

impl PlanningAgent {
    pub fn new(completion: TextCompletion) -> Self {
        Self { completion }
    }
}

#[async_trait]
impl Planner for PlanningAgent {
    async fn plan(&self, query: &str, context: PlanningContext<'_>) -> Result<String> {
        let system = prompts::planning_prompt(
            context.prior_outputs,
            context.prior_plan,
            context.feedback,
            context.tool_specs,
        );
        let plan = self.completion.generate(query, &system).await?;
        debug!(chars = plan.len(), "Planning agent replied");
        Ok(plan)
    }
}
