//! Trait definitions for the bus module.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::{ConnectError, SubmitError};
use super::types::{NotificationStream, QueueRequest};

/// One connection to the thumbnailer service.
#[async_trait]
pub trait ThumbnailerBus: Send + Sync {
    /// Returns the name of this bus implementation.
    fn name(&self) -> &str;

    /// Subscribes to every notification the service emits on this connection.
    ///
    /// Notifications for requests issued by other sessions (or other
    /// processes) are delivered too; consumers filter by handle.
    async fn subscribe(&self) -> Result<NotificationStream, SubmitError>;

    /// Queues a thumbnail request and returns the handle the service assigned.
    ///
    /// Blocks until the service acknowledges the request.
    async fn submit_request(&self, request: &QueueRequest) -> Result<u32, SubmitError>;
}

/// Opens connections to the thumbnailer service.
#[async_trait]
pub trait BusConnector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn ThumbnailerBus>, ConnectError>;
}
