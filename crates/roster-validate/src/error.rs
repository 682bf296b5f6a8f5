use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("field '{field}' has an invalid pattern: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, ValidationError>;
