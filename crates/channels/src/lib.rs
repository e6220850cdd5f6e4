//! Chat channel implementations for Notewire.
//!
//! Each channel delivers replies to a chat platform through the
//! `notewire_core::Channel` trait. Telegram is the only platform wired up;
//! its inbound update types live here too so the gateway can decode webhook
//! payloads without depending on HTTP client code.

pub mod telegram;

pub use telegram::markdown::{escape, escape_markdown};
pub use telegram::types::{InboundUpdate, Update};
pub use telegram::{TelegramChannel, TelegramConfig};
