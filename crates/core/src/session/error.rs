//! Error types for request sessions.

use thiserror::Error;

use crate::bus::{ConnectError, SubmitError};
use crate::correlator::{CorrelatorError, Failure};
use crate::target::TargetError;

/// Why one session did not produce a thumbnail.
///
/// Never aborts sibling sessions.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// The input path could not be turned into a request.
    #[error(transparent)]
    InvalidTarget(#[from] TargetError),

    /// A connection opened for this session alone could not be made.
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// The request never reached `Submitted`.
    #[error("Submission failed: {0}")]
    Submit(#[from] SubmitError),

    /// The request was submitted and then failed.
    #[error(transparent)]
    Thumbnail(#[from] Failure),

    #[error("Correlator misuse: {0}")]
    Correlator(#[from] CorrelatorError),

    /// The session task panicked or was cancelled.
    #[error("Session aborted: {0}")]
    Aborted(String),
}

impl SessionError {
    /// Short machine-friendly name of the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::InvalidTarget(_) => "invalid_target",
            SessionError::Connect(_) => "connect",
            SessionError::Submit(_) => "submit",
            SessionError::Thumbnail(Failure::Remote { .. }) => "remote",
            SessionError::Thumbnail(Failure::StreamEndedUnresolved { .. }) => {
                "stream_ended_unresolved"
            }
            SessionError::Thumbnail(Failure::Timeout { .. }) => "timeout",
            SessionError::Correlator(_) => "correlator",
            SessionError::Aborted(_) => "aborted",
        }
    }

    /// Whether the failure happened before the service assigned a handle.
    pub fn is_pre_submission(&self) -> bool {
        matches!(
            self,
            SessionError::InvalidTarget(_) | SessionError::Connect(_) | SessionError::Submit(_)
        )
    }
}
