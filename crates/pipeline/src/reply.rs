//! What the bot says back.

use notewire_channels::escape;
use std::borrow::Cow;

/// Sent when the update carries no text.
pub const MISSING_TEXT_PROMPT: &str = "Пришли текст заметки.";

/// Sent when no valid note came out of either extraction attempt.
pub const EXTRACTION_FAILED: &str = "Не получилось распознать заметку, переформулируй.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A rendered note, already MarkdownV2-escaped.
    Note(String),
    ExtractionFailed,
    MissingText,
}

impl Reply {
    /// The MarkdownV2 text handed to the channel.
    ///
    /// Both fixed sentences end in `.`, which MarkdownV2 reserves, so they are
    /// escaped here. Telegram shows them to the user verbatim.
    pub fn markup(&self) -> Cow<'_, str> {
        match self {
            Self::Note(rendered) => Cow::Borrowed(rendered),
            Self::ExtractionFailed => Cow::Owned(escape(EXTRACTION_FAILED)),
            Self::MissingText => Cow::Owned(escape(MISSING_TEXT_PROMPT)),
        }
    }

    pub fn is_note(&self) -> bool {
        matches!(self, Self::Note(_))
    }
}
