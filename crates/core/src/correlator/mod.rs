//! Request/notification correlation.
//!
//! A [`Correlator`] is primed with the handle the service assigned to one
//! request and then fed every notification its session receives. It ignores
//! anything not addressed to that handle and resolves exactly once.

mod resolver;
mod types;

pub use resolver::Correlator;
pub use types::{CorrelatorError, Failure, FinishedScope, Outcome};
