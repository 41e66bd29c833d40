//! # Playback Error Types
//!
//! Errors surfaced by the playback binding layer. Native failures inside a
//! binding are logged and never reach the host; these variants cover source
//! normalization and handle-level failures.

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Source Errors
    // ========================================================================
    /// No path is set, or the path is blank.
    #[error("No media source set")]
    SourceMissing,

    /// The path could not be turned into a URI the backend accepts.
    #[error("Invalid media source: {0}")]
    InvalidSource(String),

    // ========================================================================
    // Backend Errors
    // ========================================================================
    /// A native backend call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BridgeError),

    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    /// The intent or binding has already been disposed.
    #[error("Player disposed")]
    Disposed,

    /// The binding's driver went away before acknowledging a request.
    #[error("Binding channel closed")]
    ChannelClosed,
}

impl PlaybackError {
    /// Returns `true` if this error is transient and the operation can be retried.
    pub fn is_transient(&self) -> bool {
        match self {
            PlaybackError::Backend(err) => err.is_transient(),
            _ => false,
        }
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
