//! Error types for the page shim.

use webpage_protocol::SignalKind;

use thiserror::Error;

use crate::native::SlotId;

/// Result type alias for page operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a page.
#[derive(Debug, Error)]
pub enum Error {
    /// An API was called with an unsupported argument shape.
    ///
    /// Raised immediately and never retried (e.g. `open()` with five arguments).
    #[error("Invalid usage: {0}")]
    InvalidUsage(String),

    /// Invalid argument provided to method.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A URL could not be parsed.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Disconnect of a slot the native signal no longer holds.
    #[error("Slot {slot} is not connected to signal '{signal}'")]
    NotConnected { signal: SignalKind, slot: SlotId },

    /// The native engine reported a failure.
    #[error("Native page error: {0}")]
    Native(String),

    /// Timeout waiting for an event.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Channel closed unexpectedly.
    #[error("Channel closed unexpectedly")]
    ChannelClosed,

    /// The page was closed.
    #[error("Target closed: cannot {0} on a closed page")]
    TargetClosed(&'static str),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }

    /// Returns true if the caller used an API incorrectly.
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::InvalidUsage(_) | Error::InvalidArgument(_))
    }

    /// Returns true if the page was closed.
    pub fn is_target_closed(&self) -> bool {
        matches!(self, Error::TargetClosed(_))
    }
}
