use std::path::PathBuf;

use thiserror::Error;

use roster_model::ModelError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors from editing the mapping of the current session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("no file has been uploaded")]
    NoSession,

    #[error(transparent)]
    Mapping(#[from] ModelError),
}
