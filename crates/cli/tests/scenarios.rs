//! End-to-end thumbnail request scenarios against the mock service.

use std::sync::Arc;
use std::time::Duration;

use thumbq_core::testing::{MockReply, MockThumbnailer};
use thumbq_core::{
    Config, Failure, FileTarget, RawEnvelope, SessionCoordinator, SessionError, SubmitError,
    Topology,
};

fn coordinator(service: &MockThumbnailer, config: &Config) -> SessionCoordinator {
    SessionCoordinator::new(Arc::new(service.clone()), config)
}

fn quick_config() -> Config {
    let mut config = Config::default();
    config.session.timeout_secs = 5;
    config
}

#[tokio::test]
async fn test_ready_then_finished_succeeds() {
    let service = MockThumbnailer::new();
    service
        .reply(
            "/tmp/a.png",
            MockReply::handle(7).then(vec![
                RawEnvelope::ready(7, &["file:///tmp/a.png"]),
                RawEnvelope::finished(7),
            ]),
        )
        .await;

    let batch = coordinator(&service, &quick_config())
        .run(vec![FileTarget::new("/tmp/a.png")])
        .await
        .unwrap();

    assert!(batch.is_success());
    let report = &batch.reports[0];
    assert_eq!(report.handle, Some(7));
    assert_eq!(
        report.result.as_ref().unwrap(),
        &vec!["file:///tmp/a.png".to_string()]
    );
}

#[tokio::test]
async fn test_error_then_finished_fails_with_message() {
    let service = MockThumbnailer::new();
    service
        .reply(
            "/tmp/b.xyz",
            MockReply::handle(3).then(vec![
                RawEnvelope::error(3, &["file:///tmp/b.xyz"], -1, "No thumbnailer"),
                RawEnvelope::finished(3),
            ]),
        )
        .await;

    let batch = coordinator(&service, &quick_config())
        .run(vec![FileTarget::new("/tmp/b.xyz")])
        .await
        .unwrap();

    assert!(!batch.is_success());
    let error = batch.reports[0].error().unwrap();
    assert_eq!(error.to_string(), "No thumbnailer");
    assert_eq!(error.kind(), "remote");
}

#[tokio::test]
async fn test_interleaved_handles_on_shared_connection() {
    let service = MockThumbnailer::new();
    service.reply("/tmp/one.png", MockReply::handle(1)).await;
    service.reply("/tmp/two.png", MockReply::handle(2)).await;
    service
        .emit_after_submits(
            2,
            vec![
                RawEnvelope::ready(2, &["file:///tmp/two.png"]),
                RawEnvelope::ready(1, &["file:///tmp/one.png"]),
                RawEnvelope::finished(1),
                RawEnvelope::finished(2),
            ],
        )
        .await;

    let mut config = quick_config();
    config.session.topology = Topology::Shared;

    let batch = coordinator(&service, &config)
        .run(vec![
            FileTarget::new("/tmp/one.png"),
            FileTarget::new("/tmp/two.png"),
        ])
        .await
        .unwrap();

    assert_eq!(service.connection_count(), 1);
    assert!(batch.is_success());
    assert_eq!(
        batch.reports[0].result.as_ref().unwrap(),
        &vec!["file:///tmp/one.png".to_string()]
    );
    assert_eq!(
        batch.reports[1].result.as_ref().unwrap(),
        &vec!["file:///tmp/two.png".to_string()]
    );
}

#[tokio::test]
async fn test_finished_without_outcome_is_unresolved() {
    let service = MockThumbnailer::new();
    service
        .reply(
            "/tmp/c.png",
            MockReply::handle(9).then(vec![RawEnvelope::finished(9)]),
        )
        .await;

    let batch = coordinator(&service, &quick_config())
        .run(vec![FileTarget::new("/tmp/c.png")])
        .await
        .unwrap();

    assert!(matches!(
        batch.reports[0].error(),
        Some(SessionError::Thumbnail(Failure::StreamEndedUnresolved { handle: 9 }))
    ));
}

#[tokio::test]
async fn test_one_submit_failure_leaves_others_intact() {
    let service = MockThumbnailer::new();
    service
        .reply(
            "/tmp/2.png",
            MockReply::fail(SubmitError::call("org.freedesktop.DBus.Error.NoReply")),
        )
        .await;

    let batch = coordinator(&service, &quick_config())
        .run(vec![
            FileTarget::new("/tmp/1.png"),
            FileTarget::new("/tmp/2.png"),
            FileTarget::new("/tmp/3.png"),
        ])
        .await
        .unwrap();

    assert_eq!(batch.succeeded().count(), 2);
    let failures = batch.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].path.to_str(), Some("/tmp/2.png"));
    assert!(matches!(failures[0].error, SessionError::Submit(_)));

    let aggregate = batch.into_result().unwrap_err();
    assert!(aggregate
        .to_string()
        .starts_with("1 of 3 thumbnail requests failed"));
}

#[tokio::test]
async fn test_silent_service_times_out() {
    let service = MockThumbnailer::new();
    service.reply("/tmp/slow.png", MockReply::handle(4)).await;

    let mut config = quick_config();
    config.session.timeout_secs = 1;

    let started = std::time::Instant::now();
    let batch = coordinator(&service, &config)
        .run(vec![FileTarget::new("/tmp/slow.png")])
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(batch.reports[0].error().unwrap().kind(), "timeout");
}
