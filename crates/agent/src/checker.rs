//! Response checker: a binary sufficiency verdict on a draft.

use async_trait::async_trait;
use tracing::debug;
use webscout_core::completion::{FunctionSpec, StructuredCompletion};
use webscout_core::error::Result;

pub const RESPONSE_CHECKER: FunctionSpec = FunctionSpec {
    name: "response_checker",
    description: "Check if the response meets the requirements",
    field: "meets_requirements",
    field_description: "Check if the response meets the requirements of the query based on the following:\n\
        1. The response should be relevant to the query.\n\
        2. The response should be coherent and well-structured with citations.\n\
        3. The response should be comprehensive and address the query in its entirety.\n\
        Return 'yes' if the response meets the requirements and 'no' otherwise.",
};

#[async_trait]
pub trait Checker: Send + Sync {
    async fn check(&self, response: &str, query: &str) -> Result<bool>;
}

pub struct ResponseChecker {
    structured: StructuredCompletion,
}

impl ResponseChecker {
    pub fn new(structured: StructuredCompletion) -> Self {
        Self { structured }
    }
}

#[async_trait]
impl Checker for ResponseChecker {
    async fn check(&self, response: &str, query: &str) -> Result<bool> {
        let prompt = format!("Response: {response} \n Query: {query}");
        let verdict = self.structured.extract_field(&RESPONSE_CHECKER, &prompt).await?;
        debug!(verdict = %verdict, "Response checker replied");
        Ok(is_affirmative(&verdict))
    }
}

/// Only the exact string `yes` passes. No trimming, no case folding.
fn is_affirmative(verdict: &str) -> bool {
    verdict == "yes"
}
