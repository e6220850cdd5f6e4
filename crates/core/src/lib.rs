//! # Notewire Core
//!
//! Domain types, traits, and error definitions for the Notewire bot.
//! This crate has **no transport dependencies**. It defines the domain model
//! that the provider, channel, and pipeline crates implement against.
//!
//! ## Layout
//!
//! - [`note`]: the structured note, its validation, and its JSON Schema
//! - [`provider`]: the completion backend abstraction
//! - [`channel`]: the delivery abstraction
//! - [`message`]: prompt messages sent to a provider
//! - [`error`]: one error enum per bounded context

pub mod channel;
pub mod error;
pub mod message;
pub mod note;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use channel::{Channel, ChatId};
pub use error::{ChannelError, Error, NoteError, ProviderError, Result};
pub use message::{Message, Role};
pub use note::{NoteType, Priority, StructuredNote};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
