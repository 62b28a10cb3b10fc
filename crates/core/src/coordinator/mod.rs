//! Session coordination.
//!
//! Runs one [`RequestSession`](crate::session::RequestSession) per input file
//! concurrently and folds their reports into a [`BatchReport`].

mod runner;
mod types;

pub use runner::SessionCoordinator;
pub use types::{AggregateFailure, BatchReport, FileFailure};
