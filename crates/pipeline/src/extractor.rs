//! Structured extraction over a completion [`Provider`].

use notewire_core::error::ProviderError;
use notewire_core::message::Message;
use notewire_core::note::json_schema;
use notewire_core::provider::{Provider, ProviderRequest};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant. Extract a structured note. \
     Return only JSON that строго соответствует schema.";

pub const DEFAULT_MAX_TOKENS: u32 = 800;

/// Turns free text into an unvalidated note-shaped JSON value.
pub struct NoteExtractor {
    provider: Arc<dyn Provider>,
    max_tokens: u32,
}

impl NoteExtractor {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// The completion request for `text` at the given temperature.
    pub fn request(&self, text: &str, temperature: f32) -> ProviderRequest {
        ProviderRequest {
            messages: vec![Message::system(SYSTEM_PROMPT), Message::user(text)],
            temperature,
            max_tokens: Some(self.max_tokens),
            json_schema: Some(json_schema()),
            stream: false,
        }
    }

    /// Run one completion and parse the returned text as JSON.
    ///
    /// The value is not checked against the note schema here.
    pub async fn extract(&self, text: &str, temperature: f32) -> Result<Value, ProviderError> {
        let request = self.request(text, temperature);
        debug!(
            provider = %self.provider.name(),
            temperature,
            text_len = text.len(),
            "Requesting structured note"
        );

        let response = self.provider.complete(request).await?;

        if let Some(usage) = response.usage {
            debug!(
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion usage"
            );
        }

        serde_json::from_str(&response.text)
            .map_err(|e| ProviderError::MalformedJson(format!("completion text: {e}")))
    }
}
