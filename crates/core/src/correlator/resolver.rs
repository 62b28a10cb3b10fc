use tracing::{debug, warn};

use crate::notification::Notification;

use super::types::{CorrelatorError, Failure, FinishedScope, Outcome};

/// Tracks one request's handle and its resolution.
///
/// The first resolving notification wins; everything after it is ignored.
#[derive(Debug, Default)]
pub struct Correlator {
    expected: Option<u32>,
    resolved: Option<Outcome>,
    scope: FinishedScope,
}

impl Correlator {
    pub fn new(scope: FinishedScope) -> Self {
        Self {
            expected: None,
            resolved: None,
            scope,
        }
    }

    /// Records the handle this correlator answers to. Allowed once.
    pub fn submit(&mut self, handle: u32) -> Result<(), CorrelatorError> {
        if let Some(existing) = self.expected {
            return Err(CorrelatorError::AlreadySubmitted { existing });
        }
        self.expected = Some(handle);
        Ok(())
    }

    /// Feeds one notification.
    ///
    /// Returns the outcome if this notification resolved the request, and
    /// `None` if it was not addressed to it or the request was already
    /// resolved.
    pub fn observe(
        &mut self,
        notification: &Notification,
    ) -> Result<Option<Outcome>, CorrelatorError> {
        let expected = self.expected.ok_or(CorrelatorError::NotSubmitted)?;
        if self.resolved.is_some() {
            return Ok(None);
        }

        let outcome = match notification {
            Notification::Ready { handle, uris } if *handle == expected => Outcome::Succeeded {
                uris: uris.clone(),
            },
            Notification::Error {
                handle,
                code,
                message,
                ..
            } if *handle == expected => Outcome::Failed {
                reason: Failure::Remote {
                    code: *code,
                    message: message.clone(),
                },
            },
            Notification::Finished { handle } if self.scope.ends_stream(*handle, expected) => {
                warn!(
                    handle = expected,
                    finished = *handle,
                    "Stream finished before the request resolved"
                );
                Outcome::Failed {
                    reason: Failure::StreamEndedUnresolved { handle: expected },
                }
            }
            other => {
                debug!(
                    handle = expected,
                    kind = other.kind(),
                    other_handle = ?other.handle(),
                    "Ignoring notification"
                );
                return Ok(None);
            }
        };

        self.resolved = Some(outcome.clone());
        Ok(Some(outcome))
    }

    /// Fails the request with `reason` unless it already resolved.
    pub fn expire(&mut self, reason: Failure) -> Option<Outcome> {
        if self.resolved.is_some() {
            return None;
        }
        let outcome = Outcome::Failed { reason };
        self.resolved = Some(outcome.clone());
        Some(outcome)
    }

    pub fn expected_handle(&self) -> Option<u32> {
        self.expected
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    pub fn resolution(&self) -> Option<&Outcome> {
        self.resolved.as_ref()
    }
}
