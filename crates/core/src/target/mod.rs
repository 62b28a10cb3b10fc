//! Input files: path → `file://` URI and MIME type.

mod types;
mod uri;

pub use types::{FileTarget, ResolvedTarget, TargetError, FALLBACK_MIME_TYPE};
pub use uri::{file_uri, sniff_mime_type};
