//! Serverless-style invocation events.
//!
//! A function runtime hands over the HTTP request as a JSON event whose
//! `body` may be base64-encoded, and expects a `{statusCode, body}` object
//! back. The response is always `200 ok`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use notewire_channels::Update;
use notewire_core::error::ChannelError;
use notewire_pipeline::Dispatcher;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEvent {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub body: String,
}

impl FunctionResponse {
    pub fn ok() -> Self {
        Self {
            status_code: 200,
            body: "ok".into(),
        }
    }
}

/// Unwrap the event body into a Telegram update.
///
/// An absent or empty body is the empty update.
pub fn decode_update(event: &FunctionEvent) -> Result<Update, ChannelError> {
    let body = match event.body.as_deref() {
        None | Some("") => return Ok(Update::default()),
        Some(body) if event.is_base64_encoded => {
            let bytes = STANDARD
                .decode(body)
                .map_err(|e| ChannelError::InvalidPayload(format!("base64: {e}")))?;
            String::from_utf8(bytes)
                .map_err(|e| ChannelError::InvalidPayload(format!("utf-8: {e}")))?
        }
        Some(body) => body.to_string(),
    };

    parse_update(body.as_bytes())
}

/// Parse a raw update body. Empty input is the empty update.
pub fn parse_update(raw: &[u8]) -> Result<Update, ChannelError> {
    if raw.is_empty() {
        return Ok(Update::default());
    }
    serde_json::from_slice(raw).map_err(|e| ChannelError::InvalidPayload(format!("json: {e}")))
}

pub async fn handle_event(dispatcher: &Dispatcher, event: &FunctionEvent) -> FunctionResponse {
    match decode_update(event) {
        Ok(update) => {
            dispatcher.dispatch(&update).await;
        }
        Err(e) => warn!(error = %e, "Dropping undecodable event"),
    }
    FunctionResponse::ok()
}

/// [`handle_event`] for an event that is still raw JSON.
pub async fn handle_raw_event(dispatcher: &Dispatcher, raw: &[u8]) -> FunctionResponse {
    match serde_json::from_slice::<FunctionEvent>(raw) {
        Ok(event) => handle_event(dispatcher, &event).await,
        Err(e) => {
            warn!(error = %e, "Dropping malformed function event");
            FunctionResponse::ok()
        }
    }
}
