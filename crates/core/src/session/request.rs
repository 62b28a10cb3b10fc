use crate::correlator::Outcome;

/// Lifecycle of a request as seen by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Pending,
    Succeeded,
    Failed,
}

/// One thumbnail request.
///
/// Starts `Pending`; [`Request::resolve`] moves it to a terminal state once.
#[derive(Debug, Clone)]
pub struct Request {
    id: Option<u32>,
    target_uri: String,
    mime_type: String,
    state: RequestState,
    failure_reason: Option<String>,
}

impl Request {
    pub fn new(target_uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            id: None,
            target_uri: target_uri.into(),
            mime_type: mime_type.into(),
            state: RequestState::Pending,
            failure_reason: None,
        }
    }

    /// Records the handle assigned at submission.
    pub(crate) fn assign(&mut self, id: u32) {
        self.id = Some(id);
    }

    /// Applies a terminal outcome. Returns `false` if the request had
    /// already left `Pending`, in which case nothing changes.
    pub fn resolve(&mut self, outcome: &Outcome) -> bool {
        if self.state != RequestState::Pending {
            return false;
        }
        match outcome {
            Outcome::Succeeded { .. } => self.state = RequestState::Succeeded,
            Outcome::Failed { reason } => {
                self.state = RequestState::Failed;
                self.failure_reason = Some(reason.to_string());
            }
        }
        true
    }

    /// Fails the request for a reason outside the correlator (e.g. the
    /// submit call failed).
    pub(crate) fn fail(&mut self, reason: impl Into<String>) -> bool {
        if self.state != RequestState::Pending {
            return false;
        }
        self.state = RequestState::Failed;
        self.failure_reason = Some(reason.into());
        true
    }

    pub fn id(&self) -> Option<u32> {
        self.id
    }

    pub fn target_uri(&self) -> &str {
        &self.target_uri
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }
}
