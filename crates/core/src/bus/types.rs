//! Types exchanged with the thumbnailer bus.

use futures::stream::BoxStream;

/// A single argument of a bus signal, reduced to the shapes the thumbnailer
/// protocol uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadValue {
    U32(u32),
    I32(i32),
    Str(String),
    StrArray(Vec<String>),
    /// Anything else, kept only for diagnostics.
    Other(String),
}

impl PayloadValue {
    /// Short type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            PayloadValue::U32(_) => "u32",
            PayloadValue::I32(_) => "i32",
            PayloadValue::Str(_) => "string",
            PayloadValue::StrArray(_) => "string array",
            PayloadValue::Other(_) => "other",
        }
    }
}

/// An undecoded notification: the signal name plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEnvelope {
    pub kind: String,
    pub payload: Vec<PayloadValue>,
}

impl RawEnvelope {
    pub fn new(kind: impl Into<String>, payload: Vec<PayloadValue>) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// `Ready(handle, uris)`
    pub fn ready(handle: u32, uris: &[&str]) -> Self {
        Self::new(
            "Ready",
            vec![PayloadValue::U32(handle), string_array(uris)],
        )
    }

    /// `Error(handle, uris, code, message)`
    pub fn error(handle: u32, uris: &[&str], code: i32, message: &str) -> Self {
        Self::new(
            "Error",
            vec![
                PayloadValue::U32(handle),
                string_array(uris),
                PayloadValue::I32(code),
                PayloadValue::Str(message.to_string()),
            ],
        )
    }

    /// `Started(handle)`
    pub fn started(handle: u32) -> Self {
        Self::new("Started", vec![PayloadValue::U32(handle)])
    }

    /// `Finished(handle)`
    pub fn finished(handle: u32) -> Self {
        Self::new("Finished", vec![PayloadValue::U32(handle)])
    }
}

fn string_array(items: &[&str]) -> PayloadValue {
    PayloadValue::StrArray(items.iter().map(|s| s.to_string()).collect())
}

/// Arguments of the service's `Queue` method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRequest {
    pub uris: Vec<String>,
    pub mime_types: Vec<String>,
    /// Thumbnail flavor ("normal", "large").
    pub priority: String,
    /// Scheduler name ("default", "foreground", "background").
    pub backend: String,
    /// Handle to unqueue, 0 for none.
    pub flags: u32,
}

/// Stream of raw notifications delivered by one subscription.
///
/// The stream ends when the underlying connection goes away.
pub type NotificationStream = BoxStream<'static, RawEnvelope>;
