//! Mock provider and channel shared by the pipeline's unit tests.

use async_trait::async_trait;
use notewire_core::channel::{Channel, ChatId};
use notewire_core::error::{ChannelError, ProviderError};
use notewire_core::provider::{Provider, ProviderRequest, ProviderResponse};
use std::collections::VecDeque;
use std::sync::Mutex;

pub fn completion(text: &str) -> ProviderResponse {
    ProviderResponse {
        text: text.into(),
        usage: None,
        model: "test-model".into(),
    }
}

/// Returns scripted results in order and records each request's temperature.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<ProviderResponse, ProviderError>>>,
    temperatures: Mutex<Vec<f32>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            temperatures: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.temperatures.lock().unwrap().len()
    }

    pub fn temperatures(&self) -> Vec<f32> {
        self.temperatures.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.temperatures.lock().unwrap().push(request.temperature);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Network("script exhausted".into())))
    }
}

/// Records every message and optionally fails delivery.
pub struct RecordingChannel {
    sent: Mutex<Vec<(ChatId, String)>>,
    fail: bool,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<(ChatId, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, chat_id: &ChatId, content: &str) -> Result<(), ChannelError> {
        self.sent
            .lock()
            .unwrap()
            .push((chat_id.clone(), content.to_string()));
        if self.fail {
            return Err(ChannelError::ConnectionLost("unplugged".into()));
        }
        Ok(())
    }
}
