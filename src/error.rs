//! Error types surfaced through [`FetchState::Failed`](crate::state::FetchState::Failed).
//!
//! Errors never escape [`bind`](crate::manager::FetchStateManager::bind) as a
//! return value. They are carried inside the state so the presentation layer
//! can tell a transport failure from a malformed body.

use thiserror::Error;

/// Failure reported by a [`Transport`](crate::transport::Transport).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// The key could not be turned into a request (bad URL, method or header).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// Returns the HTTP status if the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(_) | Self::InvalidRequest(_) => None,
        }
    }
}

/// The response body could not be decoded into the requested type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Decode failed: {0}")]
pub struct DecodeError(pub String);

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self(err.to_string())
    }
}

/// Any failure of a single retrieval.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl FetchError {
    /// Returns `true` for transport failures (status or network).
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` for body decoding failures.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}
