//! The research loop state machine.
//!
//! `Planning → Searching → Integrating → Checking → (Planning | Done)`
//!
//! The guard before every `Planning` entry stops the run once the iteration
//! budget is spent, whatever the last verdict was. Tool outputs are replaced
//! every iteration and the previous draft is passed back to the planner as
//! feedback.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};
use webscout_config::AppConfig;
use webscout_core::completion::{StructuredCompletion, TextCompletion};
use webscout_core::error::Result;
use webscout_core::event::{DomainEvent, EventBus};
use webscout_core::provider::Provider;
use webscout_core::tool::{ResearchTool, ToolOutputs};

use crate::checker::{Checker, ResponseChecker};
use crate::integrator::{IntegrationAgent, Integrator};
use crate::planner::{Planner, PlanningAgent, PlanningContext};

/// Default iteration budget.
pub const DEFAULT_MAX_ITERATIONS: u32 = 5;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The checker accepted the final draft.
    Converged,
    /// The iteration budget ran out; the final draft was never accepted.
    Exhausted,
}

/// The result of one research run.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchOutcome {
    /// The last draft produced by the integration agent.
    pub answer: String,
    /// Source URLs behind the last draft.
    pub links: Vec<String>,
    pub status: RunStatus,
    /// Completed plan/search/integrate/check cycles.
    pub iterations: u32,
    /// Whether the last draft was built on degraded content.
    pub degraded: bool,
}

impl ResearchOutcome {
    pub fn converged(&self) -> bool {
        self.status == RunStatus::Converged
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Planning,
    Searching,
    Integrating,
    Checking,
    Done(RunStatus),
}

/// Everything the loop carries between phases. Lives for one run.
#[derive(Debug, Default)]
struct IterationState {
    iteration: u32,
    plan: Option<String>,
    outputs: Option<ToolOutputs>,
    response: Option<String>,
    links: Vec<String>,
}

impl IterationState {
    fn plan(&self) -> &str {
        self.plan.as_deref().unwrap_or_default()
    }

    fn degraded(&self) -> bool {
        self.outputs.as_ref().is_some_and(ToolOutputs::is_degraded)
    }
}

/// Drives planner, tool, integrator and checker until the checker accepts a
/// draft or the iteration budget runs out.
pub struct ResearchLoop {
    planner: Arc<dyn Planner>,
    tool: Arc<dyn ResearchTool>,
    integrator: Arc<dyn Integrator>,
    checker: Arc<dyn Checker>,
    event_bus: Arc<EventBus>,
    max_iterations: u32,
}

impl ResearchLoop {
    pub fn new(
        planner: Arc<dyn Planner>,
        tool: Arc<dyn ResearchTool>,
        integrator: Arc<dyn Integrator>,
        checker: Arc<dyn Checker>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            planner,
            tool,
            integrator,
            checker,
            event_bus,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Build the standard agents on `provider` with the configured model,
    /// sampling settings and iteration budget.
    pub fn from_config(
        provider: Arc<dyn Provider>,
        tool: Arc<dyn ResearchTool>,
        config: &AppConfig,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let text = TextCompletion::new(provider.clone(), config.model.clone())
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens);
        let structured = StructuredCompletion::new(provider, config.model.clone());

        Self::new(
            Arc::new(PlanningAgent::new(text.clone())),
            tool,
            Arc::new(IntegrationAgent::new(text)),
            Arc::new(ResponseChecker::new(structured)),
            event_bus,
        )
        .with_max_iterations(config.max_iterations)
    }

    /// Set the iteration budget. Values below 1 are raised to 1.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Answer `query`.
    ///
    /// Language-model failures and structured-output violations abort the
    /// run. Search and scrape failures do not: they surface as
    /// `degraded` on the outcome.
    pub async fn run(&self, query: &str) -> Result<ResearchOutcome> {
        info!(max_iterations = self.max_iterations, tool = %self.tool.name(), "Starting research run");

        let mut state = IterationState::default();
        let mut phase = Phase::Planning;

        let status = loop {
            phase = match phase {
                Phase::Planning => self.plan(query, &mut state).await?,
                Phase::Searching => self.search(query, &mut state).await?,
                Phase::Integrating => self.integrate(query, &mut state).await?,
                Phase::Checking => self.check(query, &state).await?,
                Phase::Done(status) => break status,
            };
        };

        let outcome = ResearchOutcome {
            degraded: state.degraded(),
            answer: state.response.unwrap_or_default(),
            links: state.links,
            status,
            iterations: state.iteration,
        };

        if outcome.converged() {
            info!(iterations = outcome.iterations, "Research run converged");
        } else {
            warn!(iterations = outcome.iterations, "Iteration budget exhausted without an accepted answer");
        }
        self.event_bus.publish(DomainEvent::RunFinished {
            iterations: outcome.iterations,
            converged: outcome.converged(),
            timestamp: Utc::now(),
        });

        Ok(outcome)
    }

    async fn plan(&self, query: &str, state: &mut IterationState) -> Result<Phase> {
        if state.iteration >= self.max_iterations {
            return Ok(Phase::Done(RunStatus::Exhausted));
        }
        state.iteration += 1;
        let iteration = state.iteration;

        debug!(iteration, "Planning");
        self.event_bus.publish(DomainEvent::IterationStarted {
            iteration,
            max_iterations: self.max_iterations,
            timestamp: Utc::now(),
        });

        let context = PlanningContext {
            prior_plan: state.plan.as_deref(),
            prior_outputs: state.outputs.as_ref(),
            feedback: state.response.as_deref(),
            tool_specs: self.tool.description(),
        };
        let plan = self.planner.plan(query, context).await?;

        self.event_bus.publish(DomainEvent::PlanProduced {
            iteration,
            plan: plan.clone(),
            timestamp: Utc::now(),
        });
        state.plan = Some(plan);
        Ok(Phase::Searching)
    }

    async fn search(&self, query: &str, state: &mut IterationState) -> Result<Phase> {
        debug!(iteration = state.iteration, tool = %self.tool.name(), "Searching");

        let start = Instant::now();
        let outputs = self.tool.run(state.plan(), query).await?;
        let duration_ms = start.elapsed().as_millis() as u64;

        let links = outputs.links();
        let degraded = outputs.is_degraded();
        if degraded {
            warn!(iteration = state.iteration, links = ?links, "Research tool returned degraded content");
        }

        self.event_bus.publish(DomainEvent::SourceRetrieved {
            iteration: state.iteration,
            tool_name: self.tool.name().to_string(),
            links: links.clone(),
            degraded,
            duration_ms,
            timestamp: Utc::now(),
        });

        state.links = links;
        state.outputs = Some(outputs);
        Ok(Phase::Integrating)
    }

    async fn integrate(&self, query: &str, state: &mut IterationState) -> Result<Phase> {
        debug!(iteration = state.iteration, "Integrating");

        let empty = ToolOutputs::default();
        let outputs = state.outputs.as_ref().unwrap_or(&empty);
        let draft = self.integrator.integrate(query, state.plan(), outputs).await?;

        self.event_bus.publish(DomainEvent::DraftProduced {
            iteration: state.iteration,
            draft: draft.clone(),
            timestamp: Utc::now(),
        });
        state.response = Some(draft);
        Ok(Phase::Checking)
    }

    async fn check(&self, query: &str, state: &IterationState) -> Result<Phase> {
        let draft = state.response.as_deref().unwrap_or_default();
        let sufficient = self.checker.check(draft, query).await?;
        debug!(iteration = state.iteration, sufficient, "Checked draft");

        self.event_bus.publish(DomainEvent::VerdictReached {
            iteration: state.iteration,
            sufficient,
            timestamp: Utc::now(),
        });

        Ok(if sufficient {
            Phase::Done(RunStatus::Converged)
        } else {
            Phase::Planning
        })
    }
}
