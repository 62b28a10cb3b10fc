//! Types for request correlation.

use thiserror::Error;

/// Misuse of a correlator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrelatorError {
    #[error("Notification observed before a handle was submitted")]
    NotSubmitted,

    #[error("Handle already submitted ({existing})")]
    AlreadySubmitted { existing: u32 },
}

/// Why a request did not produce a thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    /// The service reported an error for this request.
    #[error("{message}")]
    Remote { code: i32, message: String },

    /// The stream finished before any Ready/Error for this request arrived.
    #[error("Stream ended without resolution for handle {handle}")]
    StreamEndedUnresolved { handle: u32 },

    /// No resolution arrived within the configured time.
    #[error("Timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
}

/// Terminal result of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded { uris: Vec<String> },
    Failed { reason: Failure },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded { .. })
    }
}

/// Which `Finished` notifications end a session's stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FinishedScope {
    /// Any `Finished` ends the stream; for private connections.
    #[default]
    AnyHandle,
    /// Only a `Finished` for the expected handle ends the stream; for
    /// connections shared with other sessions.
    OwnHandle,
}

impl FinishedScope {
    pub(crate) fn ends_stream(self, finished_handle: u32, expected: u32) -> bool {
        match self {
            FinishedScope::AnyHandle => true,
            FinishedScope::OwnHandle => finished_handle == expected,
        }
    }
}
