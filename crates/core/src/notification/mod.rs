//! Notification decoding.
//!
//! Turns raw bus envelopes into typed [`Notification`]s. Decoding is pure:
//! it never touches correlation state, so a malformed payload can only ever
//! produce a [`DecodeError`].

mod decoder;
mod error;
mod types;

pub use decoder::decode;
pub use error::DecodeError;
pub use types::Notification;
