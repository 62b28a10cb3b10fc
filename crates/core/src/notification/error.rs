//! Error types for notification decoding.

use thiserror::Error;

/// A notification of a known kind did not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The payload has fewer arguments than the kind requires.
    #[error("{kind}: missing argument {index} ({expected})")]
    MissingField {
        kind: String,
        index: usize,
        expected: &'static str,
    },

    /// An argument has the wrong type.
    #[error("{kind}: argument {index} should be {expected}, got {found}")]
    WrongType {
        kind: String,
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
}

impl DecodeError {
    /// Name of the notification kind that failed to decode.
    pub fn kind(&self) -> &str {
        match self {
            DecodeError::MissingField { kind, .. } | DecodeError::WrongType { kind, .. } => kind,
        }
    }
}
