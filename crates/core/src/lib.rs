//! # WebScout Core
//!
//! Domain types, traits, and error definitions for the WebScout research loop.
//! This crate has **zero framework dependencies**. It defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (language model, research tool) is defined as a
//! trait here. Implementations live in their respective crates, so the loop
//! can be driven by scripted mocks in tests and by real HTTP backends in the
//! binary.

pub mod completion;
pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use completion::{FunctionSpec, StructuredCompletion, TextCompletion};
pub use error::{Error, ExtractionError, ProviderError, Result};
pub use event::{DomainEvent, EventBus};
pub use message::{Message, MessageToolCall, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolDefinition};
pub use tool::{ContentStatus, ResearchTool, SourceContent, ToolOutputs};
