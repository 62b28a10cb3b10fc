//! Correlation lifecycle integration tests.
//!
//! These tests drive notifications from the mock service through the
//! decoder and correlator, and run sessions side by side on one connection.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;

use thumbq_core::{
    decode,
    testing::{MockReply, MockThumbnailer},
    BusConnector, Correlator, Failure, FileTarget, FinishedScope, Outcome, QueueRequest,
    RawEnvelope, RequestSession, SessionError, SessionOptions, ThumbnailerBus,
};

fn queue(uri: &str) -> QueueRequest {
    QueueRequest {
        uris: vec![uri.to_string()],
        mime_types: vec!["image/png".to_string()],
        priority: "normal".to_string(),
        backend: "default".to_string(),
        flags: 0,
    }
}

/// Scripts two files whose notifications interleave on one connection.
async fn two_file_service() -> MockThumbnailer {
    let service = MockThumbnailer::new();
    service
        .reply(
            "/tmp/first.png",
            MockReply::handle(1)
                .after(Duration::from_millis(50))
                .then(vec![
                    RawEnvelope::ready(1, &["file:///tmp/first.png"]),
                    RawEnvelope::finished(1),
                ]),
        )
        .await;
    service
        .reply(
            "/tmp/second.png",
            MockReply::handle(2)
                .after(Duration::from_millis(100))
                .then(vec![
                    RawEnvelope::ready(2, &["file:///tmp/second.png"]),
                    RawEnvelope::finished(2),
                ]),
        )
        .await;
    service
}

async fn run_pair(
    bus: Arc<dyn ThumbnailerBus>,
    scope: FinishedScope,
) -> (thumbq_core::SessionReport, thumbq_core::SessionReport) {
    let options = SessionOptions::default()
        .with_timeout(Duration::from_secs(5))
        .with_finished_scope(scope);
    let first = RequestSession::new(
        FileTarget::new("/tmp/first.png"),
        Arc::clone(&bus),
        options.clone(),
    );
    let second = RequestSession::new(FileTarget::new("/tmp/second.png"), bus, options);
    tokio::join!(first.run(), second.run())
}

#[tokio::test]
async fn test_decoded_stream_resolves_correlator() {
    let service = MockThumbnailer::new();
    service
        .reply(
            "file:///tmp/a.png",
            MockReply::handle(5).then(vec![
                RawEnvelope::started(5),
                RawEnvelope::ready(4, &["file:///tmp/other.png"]),
                RawEnvelope::ready(5, &["file:///tmp/a.png"]),
                RawEnvelope::finished(5),
            ]),
        )
        .await;

    let bus = service.connect().await.unwrap();
    let mut stream = bus.subscribe().await.unwrap();
    let handle = bus.submit_request(&queue("file:///tmp/a.png")).await.unwrap();

    let mut correlator = Correlator::new(FinishedScope::AnyHandle);
    correlator.submit(handle).unwrap();

    let mut outcome = None;
    while let Some(envelope) = stream.next().await {
        let notification = decode(&envelope).unwrap();
        if let Some(resolved) = correlator.observe(&notification).unwrap() {
            outcome = Some(resolved);
            break;
        }
    }

    assert_eq!(
        outcome,
        Some(Outcome::Succeeded {
            uris: vec!["file:///tmp/a.png".to_string()]
        })
    );
    assert!(correlator.is_resolved());
}

#[tokio::test]
async fn test_own_handle_scope_isolates_sessions_on_shared_connection() {
    let service = two_file_service().await;
    let bus = service.connect().await.unwrap();

    let (first, second) = run_pair(bus, FinishedScope::OwnHandle).await;

    assert!(first.is_success());
    assert!(second.is_success());
    assert_eq!(first.handle, Some(1));
    assert_eq!(second.handle, Some(2));
}

#[tokio::test]
async fn test_any_handle_scope_ends_on_foreign_finished() {
    let service = two_file_service().await;
    let bus = service.connect().await.unwrap();

    let (first, second) = run_pair(bus, FinishedScope::AnyHandle).await;

    assert!(first.is_success());
    assert!(matches!(
        second.error(),
        Some(SessionError::Thumbnail(Failure::StreamEndedUnresolved { handle: 2 }))
    ));
}
