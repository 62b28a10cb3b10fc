//! Error types for the bus module.

use thiserror::Error;

/// The bus or the thumbnailer service could not be reached.
///
/// Fatal for the whole run when it happens before any session starts.
#[derive(Debug, Clone, Error)]
pub enum ConnectError {
    /// Connecting to the message bus failed.
    #[error("Failed to connect to the {bus} bus: {reason}")]
    Bus { bus: String, reason: String },

    /// The bus was reached but a proxy for the service could not be built.
    #[error("Failed to create proxy for {service}: {reason}")]
    Proxy { service: String, reason: String },
}

impl ConnectError {
    /// Creates a new bus connection error.
    pub fn bus(bus: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Bus {
            bus: bus.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new proxy creation error.
    pub fn proxy(service: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Proxy {
            service: service.into(),
            reason: reason.into(),
        }
    }
}

/// Submitting a request (or preparing to) failed.
///
/// Fatal for one session only.
#[derive(Debug, Clone, Error)]
pub enum SubmitError {
    /// The remote `Queue` call returned an error.
    #[error("Queue call failed: {0}")]
    Call(String),

    /// The call succeeded but its reply did not carry a handle.
    #[error("Malformed Queue reply: {0}")]
    MalformedReply(String),

    /// Subscribing to the service's notifications failed.
    #[error("Failed to subscribe to notifications: {0}")]
    Subscribe(String),

    /// The connection went away before the call completed.
    #[error("Connection closed")]
    Disconnected,
}

impl SubmitError {
    /// Creates a new call error.
    pub fn call(reason: impl Into<String>) -> Self {
        Self::Call(reason.into())
    }

    /// Creates a new malformed reply error.
    pub fn malformed_reply(reason: impl Into<String>) -> Self {
        Self::MalformedReply(reason.into())
    }

    /// Creates a new subscription error.
    pub fn subscribe(reason: impl Into<String>) -> Self {
        Self::Subscribe(reason.into())
    }
}
