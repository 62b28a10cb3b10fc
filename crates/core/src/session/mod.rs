//! Request sessions.
//!
//! A [`RequestSession`] owns one file's request from submission to its
//! terminal state:
//!
//! ```text
//! Created -> Submitted -> Succeeded | Failed -> Closed
//! ```
//!
//! Submission failures short-circuit to `Failed` before `Submitted`. The
//! whole lifecycle is bounded by [`SessionOptions::timeout`].

mod error;
mod request;
mod runner;
mod types;

pub use error::SessionError;
pub use request::{Request, RequestState};
pub use runner::RequestSession;
pub use types::{Progress, SessionOptions, SessionReport, SessionState};
