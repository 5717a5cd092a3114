//! `webscout ask` — Research one query and print the answer.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::warn;
use webscout_agent::{ResearchLoop, ResearchOutcome, RunStatus};
use webscout_config::AppConfig;
use webscout_core::event::{DomainEvent, EventBus};
use webscout_providers::build_from_config;
use webscout_tools::WebSearchTool;

pub async fn run(
    config_path: Option<&Path>,
    query: Option<String>,
    max_iterations: Option<u32>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load(config_path).map_err(|e| format!("Failed to load config: {e}"))?;
    if let Some(max) = max_iterations {
        config.max_iterations = max;
    }
    let verbose = verbose || config.verbose;

    let query = match query {
        Some(query) => query,
        None => read_query()?,
    };
    let query = query.trim();
    if query.is_empty() {
        return Err("No query given.".into());
    }

    let provider = build_from_config(&config);
    let tool = Arc::new(WebSearchTool::from_config(provider.clone(), &config));
    let event_bus = Arc::new(EventBus::default());
    let research_loop = ResearchLoop::from_config(provider, tool, &config, event_bus.clone());

    let progress = tokio::spawn(report_progress(event_bus.subscribe(), verbose));

    match research_loop.run(query).await {
        Ok(outcome) => {
            wait_for_progress(progress).await;
            println!("{}", render_outcome(&outcome));
            Ok(())
        }
        Err(e) => {
            progress.abort();
            Err(format!("Research failed: {e}").into())
        }
    }
}

/// Prompt on stdout and read one line from stdin.
fn read_query() -> std::io::Result<String> {
    print!("Enter your query: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line)
}

/// Wait for the progress reporter to drain. Returns `false` if it died.
async fn wait_for_progress(progress: JoinHandle<()>) -> bool {
    match progress.await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Progress reporter stopped abnormally");
            false
        }
    }
}

/// Print one line per loop event until the run finishes.
async fn report_progress(mut rx: broadcast::Receiver<Arc<DomainEvent>>, verbose: bool) {
    loop {
        let event = match rx.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => break,
        };

        match event.as_ref() {
            DomainEvent::IterationStarted {
                iteration,
                max_iterations,
                ..
            } => println!("[{iteration}/{max_iterations}] Planning..."),
            DomainEvent::PlanProduced { plan, .. } => {
                if verbose {
                    println!("Planning Agent: {plan}");
                }
                println!("  Searching...");
            }
            DomainEvent::SourceRetrieved {
                links,
                degraded,
                duration_ms,
                ..
            } => {
                let marker = if *degraded { " (degraded)" } else { "" };
                println!("  Source: {}{marker} [{duration_ms} ms]", links.join(", "));
                println!("  Integrating...");
            }
            DomainEvent::DraftProduced { draft, .. } => {
                if verbose {
                    println!("Integration Agent: {draft}");
                }
                println!("  Checking...");
            }
            DomainEvent::VerdictReached { sufficient, .. } => {
                let verdict = if *sufficient { "sufficient" } else { "insufficient" };
                println!("  Verdict: {verdict}");
            }
            DomainEvent::RunFinished { .. } => break,
        }
    }
}

fn render_outcome(outcome: &ResearchOutcome) -> String {
    let plural = if outcome.iterations == 1 { "" } else { "s" };
    let status = match outcome.status {
        RunStatus::Converged => format!("converged after {} iteration{plural}", outcome.iterations),
        RunStatus::Exhausted => format!(
            "exhausted after {} iteration{plural} without an accepted answer",
            outcome.iterations
        ),
    };

    let mut out = format!(
        "\nFinal Response: {}\nLinks: {}\nStatus: {status}",
        outcome.answer,
        outcome.links.join("\n")
    );
    if outcome.degraded {
        out.push_str("\nWarning: the final answer was built on content that could not be retrieved");
    }
    out
}
