//! Human-readable and JSON output.

use serde::Serialize;
use tokio::sync::mpsc;

use thumbq_core::{BatchReport, Progress, SessionReport};

/// Prints progress lines until every sender is gone.
pub async fn print_progress(mut rx: mpsc::Receiver<Progress>) {
    while let Some(progress) = rx.recv().await {
        if let Some(line) = progress_line(&progress) {
            println!("{}", line);
        }
    }
}

fn progress_line(progress: &Progress) -> Option<String> {
    match progress {
        Progress::Connected { connections: 1 } => Some("D-Bus connected.".to_string()),
        Progress::Connected { connections } => {
            Some(format!("D-Bus connected ({} connections).", connections))
        }
        Progress::Queueing { path } => Some(format!(
            "Queueing thumbnail request for {} ...",
            path.display()
        )),
        Progress::Queued { path, handle } => {
            Some(format!("{}: handle={}", path.display(), handle))
        }
        Progress::Resolved { .. } => None,
    }
}

/// One line per file, then a count of failures if there were any.
pub fn print_summary(batch: &BatchReport) {
    for report in &batch.reports {
        println!("{}", summary_line(report));
    }
    let failures = batch.failures();
    if !failures.is_empty() {
        println!(
            "{} of {} thumbnail requests failed",
            failures.len(),
            batch.reports.len()
        );
    }
}

fn summary_line(report: &SessionReport) -> String {
    match report.failure_reason() {
        None => format!("{}: Thumbnail generated!", report.path.display()),
        Some(reason) => format!("{}: {}", report.path.display(), reason),
    }
}

#[derive(Debug, Serialize)]
struct ReportView<'a> {
    path: String,
    uri: Option<&'a str>,
    mime_type: Option<&'a str>,
    handle: Option<u32>,
    elapsed_ms: u128,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    thumbnails: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorView>,
}

#[derive(Debug, Serialize)]
struct ErrorView {
    kind: &'static str,
    message: String,
}

impl<'a> From<&'a SessionReport> for ReportView<'a> {
    fn from(report: &'a SessionReport) -> Self {
        let (status, thumbnails, error) = match &report.result {
            Ok(uris) => ("succeeded", Some(uris.as_slice()), None),
            Err(e) => (
                "failed",
                None,
                Some(ErrorView {
                    kind: e.kind(),
                    message: report.failure_reason().unwrap_or_else(|| e.to_string()),
                }),
            ),
        };
        Self {
            path: report.path.display().to_string(),
            uri: report.uri.as_deref(),
            mime_type: report.mime_type.as_deref(),
            handle: report.handle,
            elapsed_ms: report.elapsed.as_millis(),
            status,
            thumbnails,
            error,
        }
    }
}

pub fn render_json(batch: &BatchReport) -> serde_json::Result<String> {
    let views: Vec<ReportView<'_>> = batch.reports.iter().map(ReportView::from).collect();
    serde_json::to_string_pretty(&views)
}
