//! Types for session coordination.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::session::{SessionError, SessionReport};

/// One failing input and why it failed.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub path: PathBuf,
    pub handle: Option<u32>,
    /// Failure reason recorded on the request.
    pub reason: String,
    pub error: SessionError,
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

/// At least one session failed. Carries one entry per failing input.
#[derive(Debug, Clone, Error)]
pub struct AggregateFailure {
    pub failures: Vec<FileFailure>,
    pub succeeded: usize,
}

impl fmt::Display for AggregateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} thumbnail requests failed",
            self.failures.len(),
            self.failures.len() + self.succeeded
        )?;
        for failure in &self.failures {
            write!(f, "\n  {}", failure)?;
        }
        Ok(())
    }
}

/// Reports of every session in a run, in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub reports: Vec<SessionReport>,
}

impl BatchReport {
    /// True iff every session succeeded.
    pub fn is_success(&self) -> bool {
        self.reports.iter().all(SessionReport::is_success)
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &SessionReport> {
        self.reports.iter().filter(|report| report.is_success())
    }

    /// One entry per failing session.
    pub fn failures(&self) -> Vec<FileFailure> {
        self.reports
            .iter()
            .filter_map(|report| {
                report.error().map(|error| FileFailure {
                    path: report.path.clone(),
                    handle: report.handle,
                    reason: report
                        .failure_reason()
                        .unwrap_or_else(|| error.to_string()),
                    error: error.clone(),
                })
            })
            .collect()
    }

    /// Collapses the batch into the aggregate result.
    pub fn into_result(self) -> Result<Vec<SessionReport>, AggregateFailure> {
        let failures = self.failures();
        if failures.is_empty() {
            Ok(self.reports)
        } else {
            Err(AggregateFailure {
                succeeded: self.reports.len() - failures.len(),
                failures,
            })
        }
    }
}
