//! The note pipeline: from an inbound update to a delivered reply.
//!
//! - [`extractor`] builds the schema-constrained completion request
//! - [`orchestrator`] runs the two-attempt temperature policy
//! - [`format`] validates a result and renders the MarkdownV2 reply
//! - [`dispatcher`] decides what to do with one Telegram update

pub mod dispatcher;
pub mod extractor;
pub mod format;
pub mod orchestrator;
pub mod reply;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatcher::{Ack, Dispatcher};
pub use extractor::NoteExtractor;
pub use format::{format_note, render_reply};
pub use orchestrator::{Attempt, Orchestrator};
pub use reply::{EXTRACTION_FAILED, MISSING_TEXT_PROMPT, Reply};
