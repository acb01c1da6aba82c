//! Turning an image file into an inline `data:` URI.

use std::path::{Path, PathBuf};

use base64::prelude::{Engine as _, BASE64_STANDARD};

use crate::error::PhotoError;

/// Reads `path` and encodes it as `data:<mime>;base64,<payload>`.
///
/// Only files whose extension maps to an `image/*` type are accepted.
pub async fn load_data_uri(path: &Path) -> Result<String, PhotoError> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(PhotoError::NotAnImage {
            path: path.to_path_buf(),
            mime: mime.essence_str().to_string(),
        });
    }

    let bytes = tokio::fs::read(path).await.map_err(|source| PhotoError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(encode_data_uri(mime.essence_str(), &bytes))
}

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    let encoded = BASE64_STANDARD.encode(bytes);
    format!("data:{mime};base64,{encoded}")
}

/// MIME type and decoded size of a base64 data URI, for display.
pub fn describe_data_uri(uri: &str) -> Option<(&str, usize)> {
    let rest = uri.strip_prefix("data:")?;
    let (mime, payload) = rest.split_once(";base64,")?;
    let padding = payload.bytes().rev().take_while(|b| *b == b'=').count();
    let size = (payload.len() / 4 * 3).saturating_sub(padding);
    Some((mime, size))
}

/// Expands a leading `~/` the way a shell would.
pub fn expand_home(input: &str) -> PathBuf {
    let input = input.trim();
    if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(input)
}

pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
