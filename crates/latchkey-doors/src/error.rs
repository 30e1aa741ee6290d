//! Error types for door actuation and board attachment.

use latchkey_core::Capability;
use latchkey_hardware::HardwareError;
use thiserror::Error;

/// Result type alias for door operations.
pub type Result<T> = std::result::Result<T, DoorError>;

/// Errors raised by the door engine.
#[derive(Debug, Error)]
pub enum DoorError {
    /// The door has no channel wired for this operation.
    #[error("door {door} does not support {capability}")]
    UnsupportedOperation { door: String, capability: Capability },

    /// The door's board has not been attached yet.
    #[error("door {0} is not bound to an attached interface kit")]
    NotBound(String),

    /// A channel read or write failed during a live request.
    #[error("hardware error: {0}")]
    Hardware(#[from] HardwareError),

    /// The board could not be created or opened.
    #[error("interface kit #{board} failed to attach: {source}")]
    AttachmentError {
        board: usize,
        #[source]
        source: HardwareError,
    },

    /// The board was opened but did not report attached in time.
    #[error("interface kit #{board} did not attach within {timeout_ms}ms")]
    AttachmentTimeout { board: usize, timeout_ms: u64 },

    /// Invalid topology.
    #[error(transparent)]
    Config(#[from] latchkey_core::Error),

    /// The unlock task ended without delivering a result.
    #[error("unlock of door {0} ended without a result")]
    Aborted(String),
}

impl DoorError {
    /// Check if this error means the operation is not wired for the door.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedOperation { .. })
    }

    /// Check if this error is fatal at startup.
    pub fn is_startup_failure(&self) -> bool {
        matches!(
            self,
            Self::AttachmentError { .. } | Self::AttachmentTimeout { .. } | Self::Config(_)
        )
    }
}
