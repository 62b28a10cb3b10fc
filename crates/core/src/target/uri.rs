use std::borrow::Cow;
use std::ffi::OsStr;
#[cfg(unix)]
use std::os::unix::ffi::OsStrExt;
use std::path::{Component, Path};

use super::types::{TargetError, FALLBACK_MIME_TYPE};

/// Builds a `file://` URI for `path`, resolving relative paths against the
/// current directory. Each path segment is percent-encoded.
pub fn file_uri(path: &Path) -> Result<String, TargetError> {
    let absolute = std::path::absolute(path).map_err(|e| TargetError::Unresolvable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut uri = String::from("file://");
    for component in absolute.components() {
        match component {
            Component::Normal(segment) => {
                uri.push('/');
                uri.push_str(&encode_segment(segment));
            }
            Component::ParentDir => {
                uri.push_str("/..");
            }
            Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
        }
    }
    if uri.len() == "file://".len() {
        uri.push('/');
    }
    Ok(uri)
}

/// Percent-encodes the raw bytes of a path segment, so names that are not
/// valid UTF-8 still point at the file on disk.
#[cfg(unix)]
fn encode_segment(segment: &OsStr) -> Cow<'_, str> {
    urlencoding::encode_binary(segment.as_bytes())
}

#[cfg(not(unix))]
fn encode_segment(segment: &OsStr) -> Cow<'_, str> {
    Cow::Owned(urlencoding::encode(&segment.to_string_lossy()).into_owned())
}

/// Guesses the MIME type of `path` from its extension.
pub fn sniff_mime_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_MIME_TYPE)
        .to_string()
}
