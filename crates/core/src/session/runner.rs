//! Request session implementation.

use std::sync::Arc;
use std::time::Instant;

use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, info, info_span, warn, Instrument, Span};

use crate::bus::{QueueRequest, ThumbnailerBus};
use crate::correlator::{Correlator, Failure, Outcome};
use crate::notification::decode;
use crate::target::{FileTarget, ResolvedTarget};

use super::error::SessionError;
use super::request::Request;
use super::types::{Progress, SessionOptions, SessionReport, SessionState};

/// Drives one file's request over a [`ThumbnailerBus`].
pub struct RequestSession {
    target: FileTarget,
    bus: Arc<dyn ThumbnailerBus>,
    options: SessionOptions,
    progress: Option<mpsc::Sender<Progress>>,
    transitions: Vec<SessionState>,
    resolved: Option<ResolvedTarget>,
    request: Option<Request>,
    correlator: Correlator,
}

impl RequestSession {
    pub fn new(target: FileTarget, bus: Arc<dyn ThumbnailerBus>, options: SessionOptions) -> Self {
        let correlator = Correlator::new(options.finished_scope);
        Self {
            target,
            bus,
            options,
            progress: None,
            transitions: vec![SessionState::Created],
            resolved: None,
            request: None,
            correlator,
        }
    }

    /// Sends progress updates to `tx`. A dropped receiver is ignored.
    pub fn with_progress(mut self, tx: mpsc::Sender<Progress>) -> Self {
        self.progress = Some(tx);
        self
    }

    pub fn state(&self) -> SessionState {
        self.transitions
            .last()
            .copied()
            .unwrap_or(SessionState::Created)
    }

    fn transition(&mut self, to: SessionState) {
        debug!(from = ?self.state(), to = ?to, "Session state");
        self.transitions.push(to);
    }

    /// Runs the session to completion and releases its stream and proxy.
    pub async fn run(mut self) -> SessionReport {
        let started = Instant::now();
        let span = info_span!(
            "session",
            path = %self.target.path.display(),
            handle = tracing::field::Empty
        );
        let timeout = self.options.timeout;

        let driven = tokio::time::timeout(timeout, self.drive())
            .instrument(span.clone())
            .await;

        let result = match driven {
            Ok(result) => result,
            Err(_) => {
                let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                let reason = Failure::Timeout { timeout_ms };
                span.in_scope(|| warn!(timeout_ms, "Session timed out"));
                self.correlator.expire(reason.clone());
                Err(SessionError::from(reason))
            }
        };

        self.finish(&result, &span);
        self.emit(Progress::Resolved {
            path: self.target.path.clone(),
            success: result.is_ok(),
        })
        .await;

        let (uri, mime_type) = match self.resolved.take() {
            Some(resolved) => (Some(resolved.uri), Some(resolved.mime_type)),
            None => (None, None),
        };
        SessionReport {
            path: self.target.path,
            uri,
            mime_type,
            handle: self.correlator.expected_handle(),
            elapsed: started.elapsed(),
            request: self.request,
            transitions: self.transitions,
            result,
        }
    }

    async fn drive(&mut self) -> Result<Vec<String>, SessionError> {
        let resolved = self.target.resolve()?;
        self.request = Some(Request::new(&resolved.uri, &resolved.mime_type));
        let queue = QueueRequest {
            uris: vec![resolved.uri.clone()],
            mime_types: vec![resolved.mime_type.clone()],
            priority: self.options.priority.clone(),
            backend: self.options.backend.clone(),
            flags: self.options.flags,
        };
        self.resolved = Some(resolved);

        // Subscribe first: the service may signal before the Queue reply is read.
        let mut notifications = self.bus.subscribe().await?;

        self.emit(Progress::Queueing {
            path: self.target.path.clone(),
        })
        .await;
        info!(mime_type = %queue.mime_types[0], "Queueing thumbnail request");
        let handle = self.bus.submit_request(&queue).await?;

        self.correlator.submit(handle)?;
        if let Some(request) = self.request.as_mut() {
            request.assign(handle);
        }
        self.transition(SessionState::Submitted { handle });
        Span::current().record("handle", handle);
        info!(handle, "Request queued");
        self.emit(Progress::Queued {
            path: self.target.path.clone(),
            handle,
        })
        .await;

        while let Some(envelope) = notifications.next().await {
            let notification = match decode(&envelope) {
                Ok(notification) => notification,
                Err(e) => {
                    warn!(error = %e, "Dropping malformed notification");
                    continue;
                }
            };
            debug!(kind = notification.kind(), from = ?notification.handle(), "Notification");

            if let Some(outcome) = self.correlator.observe(&notification)? {
                return match outcome {
                    Outcome::Succeeded { uris } => Ok(uris),
                    Outcome::Failed { reason } => Err(reason.into()),
                };
            }
        }

        warn!(handle, "Notification stream closed before the request resolved");
        let reason = Failure::StreamEndedUnresolved { handle };
        self.correlator.expire(reason.clone());
        Err(reason.into())
    }

    /// Moves the session to its terminal state and then to `Closed`.
    fn finish(&mut self, result: &Result<Vec<String>, SessionError>, span: &Span) {
        let _entered = span.enter();
        match result {
            Ok(uris) => {
                self.transition(SessionState::Succeeded);
                if let Some(request) = self.request.as_mut() {
                    request.resolve(&Outcome::Succeeded { uris: uris.clone() });
                }
                info!("Thumbnail generated");
            }
            Err(e) => {
                self.transition(SessionState::Failed);
                if let Some(request) = self.request.as_mut() {
                    match self.correlator.resolution() {
                        Some(outcome) => request.resolve(outcome),
                        None => request.fail(e.to_string()),
                    };
                }
                warn!(error = %e, kind = e.kind(), "Thumbnail request failed");
            }
        }
        self.transition(SessionState::Closed);
    }

    async fn emit(&self, progress: Progress) {
        if let Some(tx) = &self.progress {
            let _ = tx.send(progress).await;
        }
    }
}
