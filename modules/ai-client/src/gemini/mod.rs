mod client;
pub(crate) mod types;

pub use types::ToolDefinition;

use serde_json::Value;

use crate::error::{AiError, Result};

use client::GeminiClient;
use types::GenerateRequest;

// =============================================================================
// Gemini Agent
// =============================================================================

/// What the model answered when offered a function menu: either a structured
/// call or plain text.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionReply {
    Call { name: String, args: Value },
    Text(String),
}

#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    model: String,
    base_url: Option<String>,
}

impl Gemini {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| AiError::Config("GEMINI_API_KEY environment variable not set".into()))?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn client(&self) -> GeminiClient {
        let client = GeminiClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    /// Plain text generation, no tools attached.
    pub async fn generate(&self, prompt: impl Into<String>) -> Result<String> {
        let request = GenerateRequest::user_text(prompt);
        let response = self.client().generate(&self.model, &request).await?;

        response
            .text()
            .ok_or_else(|| AiError::Parse("No text in Gemini response".into()))
    }

    /// One round trip with a function menu attached. The model either names
    /// one of the declared functions with arguments, or answers in text.
    pub async fn call_with_functions(
        &self,
        prompt: impl Into<String>,
        functions: &[ToolDefinition],
    ) -> Result<FunctionReply> {
        let request = GenerateRequest::user_text(prompt)
            .tools(functions.to_vec())
            .temperature(0.0);

        let response = self.client().generate(&self.model, &request).await?;

        if let Some(call) = response.function_call() {
            return Ok(FunctionReply::Call {
                name: call.name.clone(),
                args: call.args.clone(),
            });
        }

        Ok(FunctionReply::Text(response.text().unwrap_or_default()))
    }
}
