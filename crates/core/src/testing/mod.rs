//! Testing utilities and mock implementations.
//!
//! This module provides a scriptable stand-in for the thumbnailer service,
//! allowing sessions and the coordinator to be exercised without a D-Bus
//! daemon.
//!
//! # Example
//!
//! ```rust,ignore
//! use thumbq_core::testing::{MockReply, MockThumbnailer};
//!
//! let service = MockThumbnailer::new();
//! service.reply("/tmp/broken.xyz", MockReply::handle(3).then(vec![
//!     RawEnvelope::error(3, &["file:///tmp/broken.xyz"], -1, "No thumbnailer"),
//!     RawEnvelope::finished(3),
//! ])).await;
//!
//! let coordinator = SessionCoordinator::new(Arc::new(service.clone()), config);
//! ```

mod mock_bus;
mod mock_thumbnailer;

pub use mock_bus::MockBus;
pub use mock_thumbnailer::{MockReply, MockThumbnailer};
