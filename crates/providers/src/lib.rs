//! LLM Provider implementations for WebScout.
//!
//! All providers implement the `webscout_core::Provider` trait.
//! [`build_from_config`] selects the backend named in configuration.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::build_from_config;
