//! The two-attempt extraction policy.
//!
//! Attempt one samples at 0.2. Any failure, whatever its kind, triggers a
//! single second attempt at 0.0. There is no backoff and no third attempt.

use crate::extractor::NoteExtractor;
use crate::format::render_reply;
use crate::reply::Reply;
use serde_json::Value;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    First,
    Second,
}

impl Attempt {
    pub const fn temperature(self) -> f32 {
        match self {
            Self::First => 0.2,
            Self::Second => 0.0,
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }

    /// The attempt to make after this one fails.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::First => Some(Self::Second),
            Self::Second => None,
        }
    }
}

pub struct Orchestrator {
    extractor: NoteExtractor,
}

impl Orchestrator {
    pub fn new(extractor: NoteExtractor) -> Self {
        Self { extractor }
    }

    /// Extract and render a reply for `text`. Never fails: every error ends
    /// in [`Reply::ExtractionFailed`].
    pub async fn run(&self, text: &str) -> Reply {
        let Some(value) = self.extract(text).await else {
            warn!("Both extraction attempts failed");
            return Reply::ExtractionFailed;
        };

        match render_reply(&value) {
            Ok(rendered) => Reply::Note(rendered),
            Err(e) => {
                warn!(error = %e, "Extraction result failed validation");
                Reply::ExtractionFailed
            }
        }
    }

    /// Run attempts in order until one returns a JSON value.
    pub async fn extract(&self, text: &str) -> Option<Value> {
        let mut attempt = Some(Attempt::First);

        while let Some(current) = attempt {
            match self.extractor.extract(text, current.temperature()).await {
                Ok(value) => {
                    info!(
                        provider = %self.extractor.provider_name(),
                        attempt = current.number(),
                        "Extraction succeeded"
                    );
                    return Some(value);
                }
                Err(e) => {
                    warn!(
                        provider = %self.extractor.provider_name(),
                        attempt = current.number(),
                        temperature = current.temperature(),
                        transport = e.is_transport(),
                        error = %e,
                        "Extraction attempt failed"
                    );
                    attempt = current.next();
                }
            }
        }

        None
    }
}
