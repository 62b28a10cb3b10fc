//! One connection to the mock thumbnailer service.

use async_trait::async_trait;
use futures::StreamExt;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::bus::{NotificationStream, QueueRequest, RawEnvelope, SubmitError, ThumbnailerBus};

use super::mock_thumbnailer::{MockReply, MockState};

/// Buffered notifications per connection.
const CHANNEL_CAPACITY: usize = 256;

/// Mock implementation of [`ThumbnailerBus`].
///
/// Every subscription on the same `MockBus` sees every notification emitted
/// on it, as with signal subscriptions sharing one D-Bus connection.
pub struct MockBus {
    state: Arc<MockState>,
    events: Mutex<Option<broadcast::Sender<RawEnvelope>>>,
}

impl MockBus {
    pub(super) fn new(state: Arc<MockState>) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            state,
            events: Mutex::new(Some(tx)),
        }
    }

    fn sender(&self) -> Option<broadcast::Sender<RawEnvelope>> {
        self.events.lock().ok().and_then(|events| events.clone())
    }

    fn emit(&self, events: &[RawEnvelope]) {
        if let Some(tx) = self.sender() {
            for event in events {
                // No subscribers is fine; the signal is simply lost.
                let _ = tx.send(event.clone());
            }
        }
    }

    fn disconnect(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.take();
        }
    }
}

impl Drop for MockBus {
    fn drop(&mut self) {
        self.state.open.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ThumbnailerBus for MockBus {
    fn name(&self) -> &str {
        "mock"
    }

    async fn subscribe(&self) -> Result<NotificationStream, SubmitError> {
        let rx = self.sender().ok_or(SubmitError::Disconnected)?.subscribe();
        let stream = futures::stream::unfold(rx, |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(envelope) => return Some((envelope, rx)),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Mock notification stream lagged");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        });
        Ok(stream.boxed())
    }

    async fn submit_request(&self, request: &QueueRequest) -> Result<u32, SubmitError> {
        let submitted = {
            let mut submitted = self.state.submitted.write().await;
            submitted.push(request.clone());
            submitted.len()
        };

        let uri = request.uris.first().cloned().unwrap_or_default();
        let scripted = self.state.replies.read().await.get(&uri).cloned();
        let reply = match scripted {
            Some(reply) => reply,
            None => {
                let handle = self.state.auto_handle();
                MockReply::handle(handle).then(vec![
                    RawEnvelope::ready(handle, &[uri.as_str()]),
                    RawEnvelope::finished(handle),
                ])
            }
        };

        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }

        let handle = reply.result?;
        self.emit(&reply.events);

        let deferred = {
            let mut deferred = self.state.deferred.write().await;
            match deferred.as_ref() {
                Some(pending) if pending.after_submits == submitted => deferred.take(),
                _ => None,
            }
        };
        if let Some(deferred) = deferred {
            self.emit(&deferred.events);
        }

        if reply.disconnect {
            self.disconnect();
        }
        Ok(handle)
    }
}
