//! Thumbnailer bus abstraction.
//!
//! This module provides the `ThumbnailerBus` trait (submit a request, receive
//! raw notification envelopes) and the `BusConnector` trait that opens bus
//! connections. The `dbus` implementation talks to the
//! `org.freedesktop.thumbnails.Thumbnailer1` service through zbus.

mod dbus;
mod error;
mod traits;
mod types;

pub use dbus::{DbusConnector, DbusThumbnailer};
pub use error::{ConnectError, SubmitError};
pub use traits::{BusConnector, ThumbnailerBus};
pub use types::{NotificationStream, PayloadValue, QueueRequest, RawEnvelope};
