use std::path::{Path, PathBuf};

use thiserror::Error;

use super::uri::{file_uri, sniff_mime_type};

/// MIME type used when nothing better can be guessed.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Errors turning a path into something the service can be asked about.
#[derive(Debug, Clone, Error)]
pub enum TargetError {
    #[error("Cannot resolve path {path}: {reason}")]
    Unresolvable { path: PathBuf, reason: String },
}

/// A file to thumbnail, as given by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTarget {
    pub path: PathBuf,
    /// MIME type hint; sniffed from the file name when absent.
    pub mime_type: Option<String>,
}

impl FileTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Derives the URI and settles the MIME type.
    pub fn resolve(&self) -> Result<ResolvedTarget, TargetError> {
        let uri = file_uri(&self.path)?;
        let mime_type = match &self.mime_type {
            Some(mime_type) => mime_type.clone(),
            None => sniff_mime_type(&self.path),
        };
        Ok(ResolvedTarget {
            path: self.path.clone(),
            uri,
            mime_type,
        })
    }
}

/// A target ready to be queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub path: PathBuf,
    pub uri: String,
    pub mime_type: String,
}

impl ResolvedTarget {
    pub fn path(&self) -> &Path {
        &self.path
    }
}
