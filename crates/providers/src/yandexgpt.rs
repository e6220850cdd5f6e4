//! YandexGPT Foundation Models provider.
//!
//! Talks to the synchronous `completion` endpoint:
//! - `Authorization: Api-Key <key>` header authentication (not Bearer)
//! - model addressed by URI `gpt://<folder_id>/<model>`
//! - structured output requested with a top-level `jsonSchema`
//! - response text is taken from the first alternative

use async_trait::async_trait;
use notewire_config::AppConfig;
use notewire_core::error::ProviderError;
use notewire_core::message::Message;
use notewire_core::provider::*;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_ENDPOINT: &str =
    "https://llm.api.cloud.yandex.net/foundationModels/v1/completion";
pub const DEFAULT_MODEL: &str = "yandexgpt-lite/latest";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// A YandexGPT completion provider.
pub struct YandexGptProvider {
    name: String,
    endpoint: String,
    api_key: String,
    folder_id: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for YandexGptProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YandexGptProvider")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("folder_id", &self.folder_id)
            .field("model", &self.model)
            .finish()
    }
}

impl YandexGptProvider {
    /// Create a provider for the default endpoint and model.
    pub fn new(
        api_key: impl Into<String>,
        folder_id: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        Self::with_options(
            DEFAULT_ENDPOINT,
            api_key,
            folder_id,
            DEFAULT_MODEL,
            DEFAULT_TIMEOUT,
        )
    }

    /// Create a provider with an explicit endpoint, model and request timeout.
    pub fn with_options(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        folder_id: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            name: "yandexgpt".into(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            folder_id: folder_id.into(),
            model: model.into(),
            client,
        })
    }

    /// Build from configuration. Returns `Ok(None)` when the API key or the
    /// folder id is missing.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, ProviderError> {
        let Some(creds) = config.llm_credentials() else {
            return Ok(None);
        };

        Self::with_options(
            &config.llm.endpoint,
            creds.api_key,
            creds.folder_id,
            &config.llm.model,
            Duration::from_secs(config.llm.timeout_secs),
        )
        .map(Some)
    }

    /// The model URI the request is routed to.
    pub fn model_uri(&self) -> String {
        format!("gpt://{}/{}", self.folder_id, self.model)
    }

    /// Convert our Message types to the API format.
    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: m.role.as_str().into(),
                text: m.content.clone(),
            })
            .collect()
    }

    fn build_body(&self, request: &ProviderRequest) -> ApiRequest {
        ApiRequest {
            model_uri: self.model_uri(),
            completion_options: CompletionOptions {
                stream: request.stream,
                temperature: request.temperature,
                max_tokens: request.max_tokens,
            },
            messages: Self::to_api_messages(&request.messages),
            json_schema: request.json_schema.clone(),
        }
    }
}

#[async_trait]
impl notewire_core::Provider for YandexGptProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let body = self.build_body(&request);

        debug!(
            provider = %self.name,
            model_uri = %body.model_uri,
            temperature = request.temperature,
            "Sending completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Api-Key {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(&e, e.is_timeout()))?;

        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let raw = response
            .text()
            .await
            .map_err(|e| ProviderError::from_transport(&e, e.is_timeout()))?;

        parse_completion(&raw)
    }
}

/// Extract the first alternative's text from a completion envelope.
fn parse_completion(raw: &str) -> Result<ProviderResponse, ProviderError> {
    let envelope: ApiResponse = serde_json::from_str(raw)
        .map_err(|e| ProviderError::MalformedJson(format!("completion envelope: {e}")))?;

    let result = envelope.result.unwrap_or_default();

    let alternative = result
        .alternatives
        .into_iter()
        .next()
        .ok_or(ProviderError::EmptyAlternatives)?;

    let text = alternative
        .message
        .and_then(|m| m.text)
        .filter(|t| !t.is_empty())
        .ok_or(ProviderError::EmptyResponseText)?;

    let usage = result.usage.map(|u| Usage {
        prompt_tokens: u.input_text_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });

    debug!(
        status = ?alternative.status,
        usage = ?usage,
        "Completion received"
    );

    Ok(ProviderResponse {
        text,
        usage,
        model: result.model_version.unwrap_or_default(),
    })
}

// --- API wire types ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest {
    model_uri: String,
    completion_options: CompletionOptions,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    json_schema: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionOptions {
    stream: bool,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    result: Option<ApiResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResult {
    #[serde(default)]
    alternatives: Vec<ApiAlternative>,
    #[serde(default)]
    usage: Option<ApiUsage>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiAlternative {
    #[serde(default)]
    message: Option<ApiAlternativeMessage>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiAlternativeMessage {
    #[serde(default)]
    text: Option<String>,
}

/// Token counts arrive as decimal strings (int64 in proto3 JSON).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiUsage {
    #[serde(default, deserialize_with = "lenient_u32")]
    input_text_tokens: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    completion_tokens: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    total_tokens: u32,
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Num(u32),
        Str(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Num(n) => Ok(n),
        Count::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}
