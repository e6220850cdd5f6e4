//! Telegram Bot API wire types.
//!
//! Only the fields the bot reads are modelled, and every one is optional:
//! a webhook update with an unexpected shape should degrade to "nothing to
//! do", not to a decode failure.

use notewire_core::ChatId;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TelegramResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Chat {
    #[serde(default)]
    pub id: Option<ChatId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub chat: Option<Chat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub update_id: Option<i64>,
    #[serde(default)]
    pub message: Option<TelegramMessage>,
    #[serde(default)]
    pub edited_message: Option<TelegramMessage>,
}

/// The two things the bot needs from an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundUpdate {
    pub chat_id: Option<ChatId>,
    pub text: Option<String>,
}

impl Update {
    /// Extract chat id and text.
    ///
    /// Each field is taken from `message` when it carries a non-empty value
    /// there, otherwise from `edited_message`. Empty chat ids (`""`, `0`)
    /// count as absent.
    pub fn inbound(&self) -> InboundUpdate {
        let messages = [self.message.as_ref(), self.edited_message.as_ref()];

        let text = messages
            .iter()
            .flatten()
            .find_map(|m| m.text.as_deref().filter(|t| !t.is_empty()))
            .map(str::to_string);

        let chat_id = messages
            .iter()
            .flatten()
            .find_map(|m| {
                m.chat
                    .as_ref()
                    .and_then(|chat| chat.id.clone())
                    .filter(|id| !id.is_empty())
            });

        InboundUpdate { chat_id, text }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Update {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn plain_message() {
        let update = parse(r#"{"update_id":1,"message":{"message_id":5,"text":"Buy milk","chat":{"id":42,"type":"private"}}}"#);
        let inbound = update.inbound();
        assert_eq!(inbound.chat_id, Some(ChatId::Int(42)));
        assert_eq!(inbound.text.as_deref(), Some("Buy milk"));
    }

    #[test]
    fn edited_message_only() {
        let update = parse(r#"{"edited_message":{"text":"fixed","chat":{"id":7}}}"#);
        let inbound = update.inbound();
        assert_eq!(inbound.chat_id, Some(ChatId::Int(7)));
        assert_eq!(inbound.text.as_deref(), Some("fixed"));
    }

    #[test]
    fn message_preferred_over_edit() {
        let update = parse(
            r#"{"message":{"text":"new","chat":{"id":1}},"edited_message":{"text":"old","chat":{"id":2}}}"#,
        );
        let inbound = update.inbound();
        assert_eq!(inbound.chat_id, Some(ChatId::Int(1)));
        assert_eq!(inbound.text.as_deref(), Some("new"));
    }

    #[test]
    fn fields_resolved_independently() {
        // Photo message without text: chat from message, text from the edit.
        let update = parse(
            r#"{"message":{"chat":{"id":1}},"edited_message":{"text":"caption fix","chat":{"id":2}}}"#,
        );
        let inbound = update.inbound();
        assert_eq!(inbound.chat_id, Some(ChatId::Int(1)));
        assert_eq!(inbound.text.as_deref(), Some("caption fix"));
    }

    #[test]
    fn empty_text_counts_as_absent() {
        let update = parse(r#"{"message":{"text":"","chat":{"id":3}}}"#);
        assert!(update.inbound().text.is_none());
    }

    #[test]
    fn empty_object_has_nothing() {
        assert_eq!(parse("{}").inbound(), InboundUpdate::default());
        assert_eq!(
            parse(r#"{"message":null,"callback_query":{"id":"x"}}"#).inbound(),
            InboundUpdate::default()
        );
    }

    #[test]
    fn string_chat_id() {
        let update = parse(r#"{"message":{"text":"hi","chat":{"id":"@notes"}}}"#);
        assert_eq!(update.inbound().chat_id, Some(ChatId::from("@notes")));
    }

    #[test]
    fn chat_without_id() {
        let update = parse(r#"{"message":{"text":"hi","chat":{}}}"#);
        assert!(update.inbound().chat_id.is_none());

        let update = parse(r#"{"message":{"text":"hi","chat":{}},"edited_message":{"chat":{"id":9}}}"#);
        assert_eq!(update.inbound().chat_id, Some(ChatId::Int(9)));
    }

    #[test]
    fn empty_chat_id_counts_as_absent() {
        let update = parse(r#"{"message":{"text":"hi","chat":{"id":""}}}"#);
        assert!(update.inbound().chat_id.is_none());

        let update = parse(r#"{"message":{"text":"hi","chat":{"id":0}}}"#);
        assert!(update.inbound().chat_id.is_none());

        let update = parse(r#"{"message":{"text":"hi","chat":{"id":""}},"edited_message":{"chat":{"id":"@notes"}}}"#);
        assert_eq!(update.inbound().chat_id, Some(ChatId::from("@notes")));
    }
}
