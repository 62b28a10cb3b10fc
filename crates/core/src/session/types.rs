//! Types for request sessions.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::{Config, Topology};
use crate::correlator::FinishedScope;

use super::error::SessionError;
use super::request::Request;

/// Per-session settings, derived from [`Config`].
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub priority: String,
    pub backend: String,
    pub flags: u32,
    /// Bound on submit + wait.
    pub timeout: Duration,
    pub finished_scope: FinishedScope,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl SessionOptions {
    /// Sessions sharing a connection see every other session's `Finished`,
    /// so only their own may end their stream.
    pub fn from_config(config: &Config) -> Self {
        let finished_scope = match config.session.topology {
            Topology::Isolated => FinishedScope::AnyHandle,
            Topology::Shared => FinishedScope::OwnHandle,
        };
        Self {
            priority: config.request.priority.clone(),
            backend: config.request.backend.clone(),
            flags: config.request.flags,
            timeout: Duration::from_secs(config.session.timeout_secs),
            finished_scope,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_finished_scope(mut self, scope: FinishedScope) -> Self {
        self.finished_scope = scope;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Submitted { handle: u32 },
    Succeeded,
    Failed,
    Closed,
}

/// Progress updates, for callers that want to narrate a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// All bus connections needed for the run are up.
    Connected { connections: usize },
    /// A session is about to call `Queue`.
    Queueing { path: PathBuf },
    /// The service assigned `handle`.
    Queued { path: PathBuf, handle: u32 },
    /// A session reached its terminal state.
    Resolved { path: PathBuf, success: bool },
}

/// Final account of one session.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub path: PathBuf,
    pub uri: Option<String>,
    pub mime_type: Option<String>,
    /// Handle assigned by the service; `None` if submission never succeeded.
    pub handle: Option<u32>,
    pub elapsed: Duration,
    /// The request as it stood when the session closed; `None` if the
    /// target could not be resolved.
    pub request: Option<Request>,
    /// Every state the session went through, starting with `Created`.
    pub transitions: Vec<SessionState>,
    /// Thumbnailed URIs on success.
    pub result: Result<Vec<String>, SessionError>,
}

impl SessionReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&SessionError> {
        self.result.as_ref().err()
    }

    /// Last state the session reached.
    pub fn state(&self) -> SessionState {
        self.transitions
            .last()
            .copied()
            .unwrap_or(SessionState::Created)
    }

    /// Why the request failed, as recorded on the request itself when there
    /// is one.
    pub fn failure_reason(&self) -> Option<String> {
        let error = self.error()?;
        let recorded = self
            .request
            .as_ref()
            .and_then(Request::failure_reason)
            .map(str::to_string);
        Some(recorded.unwrap_or_else(|| error.to_string()))
    }

    /// Report for a session that failed before it could start.
    pub fn failed(path: PathBuf, error: SessionError) -> Self {
        Self {
            path,
            uri: None,
            mime_type: None,
            handle: None,
            elapsed: Duration::ZERO,
            request: None,
            transitions: vec![SessionState::Created, SessionState::Failed],
            result: Err(error),
        }
    }

    /// Report for a session that never got to run.
    pub fn aborted(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::failed(path, SessionError::Aborted(reason.into()))
    }
}
