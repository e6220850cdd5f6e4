//! Error types for the Notewire domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for wiring up the Notewire pipeline.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Channel errors ---
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed JSON: {0}")]
    MalformedJson(String),

    #[error("Empty alternatives in completion response")]
    EmptyAlternatives,

    #[error("Empty response text in completion alternative")]
    EmptyResponseText,
}

impl ProviderError {
    /// Whether the failure happened at the transport level (connection,
    /// timeout, non-2xx status) rather than in the response contents.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ApiError { .. }
                | Self::AuthenticationFailed(_)
                | Self::Timeout(_)
                | Self::Network(_)
        )
    }

    /// Map a `reqwest` failure onto the provider taxonomy.
    pub fn from_transport(err: impl std::fmt::Display, is_timeout: bool) -> Self {
        if is_timeout {
            Self::Timeout(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Channel not configured: {0}")]
    NotConfigured(String),

    #[error("Message delivery failed to {channel}: {reason}")]
    DeliveryFailed { channel: String, reason: String },

    #[error("Channel connection lost: {0}")]
    ConnectionLost(String),

    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),
}

/// Schema mismatch found while validating an extraction result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}
