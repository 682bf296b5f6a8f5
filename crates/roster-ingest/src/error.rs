use std::path::PathBuf;

use thiserror::Error;

/// Reasons an upload is rejected before any session is created.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported media type '{media_type}' for {file_name}: expected text/csv")]
    UnsupportedMediaType {
        file_name: String,
        media_type: String,
    },

    #[error("file is {size} bytes, larger than the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    #[error("file has more than {limit} data rows")]
    TooManyRows { limit: usize },

    #[error("file is not valid UTF-8 text")]
    Unreadable,

    #[error("malformed CSV at line {line}: {message}")]
    Malformed { line: u64, message: String },

    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write template: {0}")]
    Template(String),
}

pub type Result<T> = std::result::Result<T, IngestError>;
