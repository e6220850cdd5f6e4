//! Channel trait: the abstraction over chat delivery.
//!
//! A Channel sends a reply back to the chat an update came from. Inbound
//! updates arrive through the gateway, so the trait only covers the
//! outbound half.

use crate::error::ChannelError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Identifier of a chat within a channel.
///
/// Telegram uses integers for chats and strings for `@channel` usernames;
/// either form is sent back exactly as it was received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
    Int(i64),
    Str(String),
}

impl ChatId {
    /// `0` and `""` do not address any chat.
    pub fn is_empty(&self) -> bool {
        match self {
            ChatId::Int(id) => *id == 0,
            ChatId::Str(id) => id.is_empty(),
        }
    }
}

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatId::Int(id) => write!(f, "{id}"),
            ChatId::Str(id) => write!(f, "{id}"),
        }
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        ChatId::Int(id)
    }
}

impl From<&str> for ChatId {
    fn from(id: &str) -> Self {
        ChatId::Str(id.to_string())
    }
}

/// The core Channel trait.
///
/// Implementations handle platform-specific formatting flags and
/// authentication of the outbound call.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name (e.g., "telegram").
    fn name(&self) -> &str;

    /// Send a message to a specific chat.
    ///
    /// `content` must already be escaped for the channel's markup.
    async fn send(
        &self,
        chat_id: &ChatId,
        content: &str,
    ) -> std::result::Result<(), ChannelError>;

    /// Is the channel reachable with the configured credentials?
    async fn health_check(&self) -> std::result::Result<bool, ChannelError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_id_roundtrips_both_forms() {
        let int: ChatId = serde_json::from_str("123456").unwrap();
        assert_eq!(int, ChatId::Int(123456));
        assert_eq!(serde_json::to_string(&int).unwrap(), "123456");

        let s: ChatId = serde_json::from_str("\"@notes\"").unwrap();
        assert_eq!(s, ChatId::from("@notes"));
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"@notes\"");
    }

    #[test]
    fn empty_chat_ids() {
        assert!(ChatId::Int(0).is_empty());
        assert!(ChatId::from("").is_empty());
        assert!(!ChatId::Int(-100).is_empty());
        assert!(!ChatId::from("@notes").is_empty());
    }

    #[test]
    fn chat_id_display() {
        assert_eq!(ChatId::from(-100_200).to_string(), "-100200");
        assert_eq!(ChatId::from("@notes").to_string(), "@notes");
    }
}
