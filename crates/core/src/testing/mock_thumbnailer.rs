//! Mock thumbnailer service for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::bus::{BusConnector, ConnectError, QueueRequest, RawEnvelope, SubmitError, ThumbnailerBus};
use crate::target::file_uri;

use super::mock_bus::MockBus;

/// First handle handed out for requests without a scripted reply.
const FIRST_AUTO_HANDLE: u32 = 1000;

/// How the mock service answers a `Queue` call for one URI.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub(super) result: Result<u32, SubmitError>,
    pub(super) events: Vec<RawEnvelope>,
    pub(super) disconnect: bool,
    pub(super) delay: Duration,
}

impl MockReply {
    /// Acknowledge with `handle` and emit nothing.
    pub fn handle(handle: u32) -> Self {
        Self {
            result: Ok(handle),
            events: Vec::new(),
            disconnect: false,
            delay: Duration::ZERO,
        }
    }

    /// Fail the `Queue` call.
    pub fn fail(error: SubmitError) -> Self {
        Self {
            result: Err(error),
            events: Vec::new(),
            disconnect: false,
            delay: Duration::ZERO,
        }
    }

    /// Emit `events` on the connection before the reply is returned.
    pub fn then(mut self, events: Vec<RawEnvelope>) -> Self {
        self.events = events;
        self
    }

    /// Close the connection's notification streams after emitting.
    pub fn then_disconnect(mut self) -> Self {
        self.disconnect = true;
        self
    }

    /// Hold the `Queue` call for `delay` before answering.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Events released once a number of requests have been queued.
#[derive(Debug, Clone)]
pub(super) struct Deferred {
    pub(super) after_submits: usize,
    pub(super) events: Vec<RawEnvelope>,
}

#[derive(Debug, Default)]
pub(super) struct MockState {
    pub(super) replies: RwLock<HashMap<String, MockReply>>,
    pub(super) submitted: RwLock<Vec<QueueRequest>>,
    pub(super) deferred: RwLock<Option<Deferred>>,
    pub(super) connect_error: RwLock<Option<ConnectError>>,
    pub(super) connections: AtomicUsize,
    pub(super) open: AtomicUsize,
    pub(super) peak_open: AtomicUsize,
    pub(super) next_handle: AtomicU32,
}

impl MockState {
    pub(super) fn auto_handle(&self) -> u32 {
        FIRST_AUTO_HANDLE + self.next_handle.fetch_add(1, Ordering::SeqCst)
    }
}

/// Mock implementation of the thumbnailer service.
///
/// Acts as a [`BusConnector`]: every `connect` opens a new [`MockBus`] with
/// its own notification channel, like a private D-Bus connection. Replies
/// are scripted per file; unscripted files get a fresh handle followed by
/// `Ready` and `Finished`.
///
/// # Example
///
/// ```rust,ignore
/// use thumbq_core::testing::{MockReply, MockThumbnailer};
///
/// let service = MockThumbnailer::new();
/// service
///     .reply("/tmp/a.png", MockReply::handle(7).then(vec![
///         RawEnvelope::ready(7, &["file:///tmp/a.png"]),
///         RawEnvelope::finished(7),
///     ]))
///     .await;
///
/// let bus = service.connect().await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockThumbnailer {
    state: Arc<MockState>,
}

impl MockThumbnailer {
    /// Create a new mock service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the reply for `path` (or a literal `file://` URI).
    pub async fn reply(&self, path: impl AsRef<Path>, reply: MockReply) {
        self.state
            .replies
            .write()
            .await
            .insert(uri_key(path.as_ref()), reply);
    }

    /// Emit `events` on the connection that receives the `after_submits`-th
    /// request, right after acknowledging it.
    pub async fn emit_after_submits(&self, after_submits: usize, events: Vec<RawEnvelope>) {
        *self.state.deferred.write().await = Some(Deferred {
            after_submits,
            events,
        });
    }

    /// Make every following `connect` fail.
    pub async fn fail_connect(&self, error: ConnectError) {
        *self.state.connect_error.write().await = Some(error);
    }

    /// All `Queue` calls received so far, in arrival order.
    pub async fn submitted(&self) -> Vec<QueueRequest> {
        self.state.submitted.read().await.clone()
    }

    /// Number of connections opened.
    pub fn connection_count(&self) -> usize {
        self.state.connections.load(Ordering::SeqCst)
    }

    /// Number of connections currently open.
    pub fn open_connections(&self) -> usize {
        self.state.open.load(Ordering::SeqCst)
    }

    /// Most connections that were open at the same time.
    pub fn peak_connections(&self) -> usize {
        self.state.peak_open.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BusConnector for MockThumbnailer {
    async fn connect(&self) -> Result<Arc<dyn ThumbnailerBus>, ConnectError> {
        if let Some(error) = self.state.connect_error.read().await.clone() {
            return Err(error);
        }
        self.state.connections.fetch_add(1, Ordering::SeqCst);
        let open = self.state.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.peak_open.fetch_max(open, Ordering::SeqCst);
        Ok(Arc::new(MockBus::new(Arc::clone(&self.state))))
    }
}

fn uri_key(path: &Path) -> String {
    let raw = path.to_string_lossy();
    if raw.starts_with("file://") {
        return raw.into_owned();
    }
    file_uri(path).unwrap_or_else(|_| raw.into_owned())
}
