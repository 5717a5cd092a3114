//! Model capabilities built on top of a [`Provider`].
//!
//! Two distinct capabilities with different failure semantics:
//!
//! - [`TextCompletion`]: free-text generation. Whatever the model writes is
//!   returned verbatim.
//! - [`StructuredCompletion`]: schema-constrained extraction. The model is
//!   forced to call a single-field function; the field value is returned, and
//!   anything else is an [`ExtractionError`].

use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{ExtractionError, ProviderError, Result};
use crate::message::Message;
use crate::provider::{Provider, ProviderRequest, ToolDefinition};

/// Free-text generation against a fixed model and sampling settings.
#[derive(Clone)]
pub struct TextCompletion {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl TextCompletion {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Send `[user, system]` and return the reply text.
    ///
    /// The user turn goes first, followed by the system instruction. A reply
    /// that carries no text is a [`ProviderError::MalformedResponse`].
    pub async fn generate(&self, user: &str, system: &str) -> std::result::Result<String, ProviderError> {
        let mut request = ProviderRequest::new(
            self.model.clone(),
            vec![Message::user(user), Message::system(system)],
        );
        request.temperature = self.temperature;
        request.max_tokens = self.max_tokens;

        debug!(provider = %self.provider.name(), model = %self.model, "Free-text completion");
        let response = self.provider.complete(request).await?;
        response
            .message
            .content
            .ok_or_else(|| ProviderError::MalformedResponse("reply has no content".into()))
    }
}

/// A function with exactly one required string parameter.
///
/// This is the only shape of structured output the agents need: a query, a
/// URL, or a yes/no verdict.
#[derive(Debug, Clone)]
pub struct FunctionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub field: &'static str,
    pub field_description: &'static str,
}

impl FunctionSpec {
    pub fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.to_string(),
            description: self.description.to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    self.field: {
                        "type": "string",
                        "description": self.field_description,
                    }
                },
                "required": [self.field],
            }),
        }
    }
}

/// Forced single-field extraction at temperature 0.
#[derive(Clone)]
pub struct StructuredCompletion {
    provider: Arc<dyn Provider>,
    model: String,
}

impl StructuredCompletion {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Ask the model to fill `spec` for `prompt` and return the field value.
    pub async fn extract_field(&self, spec: &FunctionSpec, prompt: &str) -> Result<String> {
        let mut request = ProviderRequest::new(self.model.clone(), vec![Message::user(prompt)]);
        request.tools = vec![spec.to_definition()];
        request.forced_function = Some(spec.name.to_string());

        debug!(provider = %self.provider.name(), function = spec.name, "Structured completion");
        let response = self.provider.complete(request).await?;

        let call = response
            .message
            .tool_calls
            .first()
            .ok_or_else(|| ExtractionError::NoToolCall {
                function: spec.name.to_string(),
            })?;
        trace!(function = spec.name, arguments = %call.arguments, "Tool call arguments");

        parse_field(spec, &call.arguments)
    }
}

/// Pull `spec.field` out of a JSON-object argument string.
fn parse_field(spec: &FunctionSpec, arguments: &str) -> Result<String> {
    let value: serde_json::Value =
        serde_json::from_str(arguments).map_err(|e| ExtractionError::InvalidArguments {
            function: spec.name.to_string(),
            reason: e.to_string(),
        })?;

    let object = value.as_object().ok_or_else(|| ExtractionError::InvalidArguments {
        function: spec.name.to_string(),
        reason: format!("expected an object, got {value}"),
    })?;

    let field = object
        .get(spec.field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ExtractionError::MissingField {
            function: spec.name.to_string(),
            field: spec.field.to_string(),
        })?;

    Ok(field.to_string())
}
