use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Native call rejected in current state: {0}")]
    InvalidState(String),

    #[error("Data source rejected: {0}")]
    DataSource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Returns `true` when the native side is expected to accept the same call
    /// once it settles (e.g. after a pending prepare finishes).
    pub fn is_transient(&self) -> bool {
        matches!(self, BridgeError::InvalidState(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
