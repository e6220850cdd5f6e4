//! Per-update decision logic.
//!
//! The dispatcher is built once from [`AppConfig`] and shared across
//! requests. Whatever happens inside, [`Dispatcher::dispatch`] returns an
//! [`Ack`]: Telegram redelivers updates that are not acknowledged.

use crate::extractor::NoteExtractor;
use crate::orchestrator::Orchestrator;
use crate::reply::Reply;
use notewire_channels::{TelegramChannel, TelegramConfig, Update};
use notewire_config::AppConfig;
use notewire_core::channel::{Channel, ChatId};
use notewire_providers::YandexGptProvider;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Acknowledgement returned to the inbound transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack;

pub struct Dispatcher {
    channel: Option<Arc<dyn Channel>>,
    orchestrator: Option<Orchestrator>,
}

impl Dispatcher {
    pub fn new(channel: Option<Arc<dyn Channel>>, orchestrator: Option<Orchestrator>) -> Self {
        Self {
            channel,
            orchestrator,
        }
    }

    /// Wire up Telegram delivery and YandexGPT extraction from config.
    ///
    /// A missing token or missing credentials leave the matching half
    /// disabled rather than failing.
    pub fn from_config(config: &AppConfig) -> notewire_core::Result<Self> {
        let channel = TelegramConfig::from_app_config(config)
            .map(TelegramChannel::new)
            .transpose()?
            .map(|ch| Arc::new(ch) as Arc<dyn Channel>);

        let orchestrator = YandexGptProvider::from_config(config)?.map(|provider| {
            Orchestrator::new(
                NoteExtractor::new(Arc::new(provider)).with_max_tokens(config.llm.max_tokens),
            )
        });

        Ok(Self::new(channel, orchestrator))
    }

    pub fn delivery_enabled(&self) -> bool {
        self.channel.is_some()
    }

    pub fn extraction_enabled(&self) -> bool {
        self.orchestrator.is_some()
    }

    pub fn orchestrator(&self) -> Option<&Orchestrator> {
        self.orchestrator.as_ref()
    }

    pub async fn dispatch(&self, update: &Update) -> Ack {
        let inbound = update.inbound();

        let Some(chat_id) = inbound.chat_id else {
            debug!(update_id = ?update.update_id, "Update has no chat, ignoring");
            return Ack;
        };

        let Some(text) = inbound.text else {
            info!(chat_id = %chat_id, "Update has no text, prompting");
            if let Some(channel) = &self.channel {
                deliver(channel.as_ref(), &chat_id, &Reply::MissingText).await;
            }
            return Ack;
        };

        let (Some(channel), Some(orchestrator)) = (&self.channel, &self.orchestrator) else {
            debug!(
                chat_id = %chat_id,
                delivery = self.delivery_enabled(),
                extraction = self.extraction_enabled(),
                "Pipeline not configured, ignoring update"
            );
            return Ack;
        };

        info!(chat_id = %chat_id, text_len = text.len(), "Extracting note");
        let reply = orchestrator.run(&text).await;
        deliver(channel.as_ref(), &chat_id, &reply).await;

        Ack
    }
}

/// Best-effort send. Failures are logged and dropped.
async fn deliver(channel: &dyn Channel, chat_id: &ChatId, reply: &Reply) {
    if let Err(e) = channel.send(chat_id, &reply.markup()).await {
        warn!(
            channel = %channel.name(),
            chat_id = %chat_id,
            error = %e,
            "Reply delivery failed"
        );
    }
}
