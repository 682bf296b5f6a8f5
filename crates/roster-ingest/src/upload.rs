//! Upload acceptance: media type gate, size limits, and text decoding.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IngestError, Result};

pub const CSV_MEDIA_TYPE: &str = "text/csv";

/// Media types accepted as CSV. Browsers report `.csv` files under several
/// names depending on platform.
pub const ACCEPTED_MEDIA_TYPES: &[&str] =
    &[CSV_MEDIA_TYPE, "application/csv", "application/vnd.ms-excel"];

const DEFAULT_MAX_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_MAX_ROWS: usize = 10_000;

/// Ceilings that keep parsing synchronous and bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestLimits {
    /// Largest accepted upload, in bytes.
    pub max_bytes: usize,
    /// Largest accepted number of data rows (header excluded).
    pub max_rows: usize,
}

impl Default for IngestLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

/// A file handed to the import step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    /// Declared media type, if the picker reported one.
    pub media_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(
        file_name: impl Into<String>,
        media_type: Option<&str>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.map(str::to_string),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk. The media type is left undeclared and is
    /// inferred from the extension when checked.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            file_name,
            media_type: None,
            bytes,
        })
    }

    #[must_use]
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Declared media type essence, or one inferred from the file name.
    pub fn effective_media_type(&self) -> Option<String> {
        match &self.media_type {
            Some(declared) => Some(media_type_essence(declared)),
            None => infer_media_type(&self.file_name).map(str::to_string),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Lowercased media type with parameters (`; charset=...`) removed.
pub fn media_type_essence(raw: &str) -> String {
    raw.split(';').next().unwrap_or("").trim().to_ascii_lowercase()
}

/// Media type for a file name based on its extension.
pub fn infer_media_type(file_name: &str) -> Option<&'static str> {
    let extension = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "csv" => Some(CSV_MEDIA_TYPE),
        "txt" | "text" => Some("text/plain"),
        "tsv" => Some("text/tab-separated-values"),
        "json" => Some("application/json"),
        "xlsx" => Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        _ => None,
    }
}

/// Reject anything that is not CSV before the parser sees it.
pub fn check_media_type(file: &UploadFile) -> Result<()> {
    let media_type = file.effective_media_type();
    let accepted = media_type
        .as_deref()
        .is_some_and(|essence| ACCEPTED_MEDIA_TYPES.contains(&essence));
    if accepted {
        debug!(file = %file.file_name, media_type = ?media_type, "media type accepted");
        return Ok(());
    }
    Err(IngestError::UnsupportedMediaType {
        file_name: file.file_name.clone(),
        media_type: media_type.unwrap_or_else(|| "unknown".to_string()),
    })
}

/// Decode upload bytes as UTF-8, dropping a leading byte-order mark.
pub fn decode_text(bytes: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(bytes).map_err(|_| IngestError::Unreadable)?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}
