//! Domain events published by the research loop.
//!
//! The research loop publishes an event at each state transition. The CLI
//! subscribes and prints progress; tests subscribe to observe the sequence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A new plan/search/integrate/check cycle began
    IterationStarted {
        iteration: u32,
        max_iterations: u32,
        timestamp: DateTime<Utc>,
    },

    /// The planning agent produced a plan
    PlanProduced {
        iteration: u32,
        plan: String,
        timestamp: DateTime<Utc>,
    },

    /// The research tool returned a source
    SourceRetrieved {
        iteration: u32,
        tool_name: String,
        links: Vec<String>,
        degraded: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// The integration agent produced a draft answer
    DraftProduced {
        iteration: u32,
        draft: String,
        timestamp: DateTime<Utc>,
    },

    /// The checker judged the draft
    VerdictReached {
        iteration: u32,
        sufficient: bool,
        timestamp: DateTime<Utc>,
    },

    /// The loop stopped
    RunFinished {
        iterations: u32,
        converged: bool,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // Ignore send errors (no subscribers = that's fine)
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
