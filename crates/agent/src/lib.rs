//! The research loop — the heart of WebScout.
//!
//! Each iteration follows a **Plan → Search → Integrate → Check** cycle:
//!
//! 1. **Plan**: the planning agent refines a free-text plan from the query,
//!    the previous plan, the previous tool outputs and the previous draft
//! 2. **Search**: the research tool retrieves one source for the plan
//! 3. **Integrate**: the integration agent drafts a cited answer
//! 4. **Check**: the response checker returns a yes/no verdict
//!
//! The loop stops on the first accepted draft or when the iteration budget
//! is spent. Either way the last draft and its sources are returned, with a
//! status telling the two apart.

pub mod checker;
pub mod integrator;
pub mod loop_runner;
pub mod planner;
pub mod prompts;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use checker::{Checker, RESPONSE_CHECKER, ResponseChecker};
pub use integrator::{IntegrationAgent, Integrator};
pub use loop_runner::{DEFAULT_MAX_ITERATIONS, ResearchLoop, ResearchOutcome, RunStatus};
pub use planner::{Planner, PlanningAgent, PlanningContext};
