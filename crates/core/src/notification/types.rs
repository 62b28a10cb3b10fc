//! Typed notifications emitted by the thumbnailer service.

/// A decoded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Thumbnails for `uris` are ready.
    Ready { handle: u32, uris: Vec<String> },
    /// Thumbnailing `uris` failed.
    Error {
        handle: u32,
        uris: Vec<String>,
        code: i32,
        message: String,
    },
    /// The service is done with the request identified by `handle`.
    ///
    /// Marks the end of a session's stream; the handle is informational.
    Finished { handle: u32 },
    /// Any other signal; carries no outcome.
    Unknown { kind: String },
}

impl Notification {
    /// The signal name this notification was decoded from.
    pub fn kind(&self) -> &str {
        match self {
            Notification::Ready { .. } => "Ready",
            Notification::Error { .. } => "Error",
            Notification::Finished { .. } => "Finished",
            Notification::Unknown { kind } => kind,
        }
    }

    /// The request handle carried by the notification, if any.
    pub fn handle(&self) -> Option<u32> {
        match self {
            Notification::Ready { handle, .. }
            | Notification::Error { handle, .. }
            | Notification::Finished { handle } => Some(*handle),
            Notification::Unknown { .. } => None,
        }
    }
}
