//! Error types for analysis requests.

use thiserror::Error;

/// Ways an analysis request can fail. None of them affect the import.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Connection, timeout, or other transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// Endpoint answered with a non-success status.
    #[error("analysis endpoint returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Endpoint answered `success: false`.
    #[error("analysis was rejected: {0}")]
    Rejected(String),

    /// Response body was not the expected JSON.
    #[error("could not read analysis response: {0}")]
    Decode(String),

    /// Another analysis request is still outstanding.
    #[error("an analysis request is already in progress")]
    InFlight,
}

impl AnalysisError {
    /// Short message suitable for the analysis panel.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) => "Could not reach the analysis service. Please check your connection.",
            Self::Status { .. } | Self::Decode(_) => {
                "The analysis service returned an unexpected response."
            }
            Self::Rejected(_) => "The analysis service could not analyse this upload.",
            Self::InFlight => "An analysis is already running.",
        }
    }

    /// Whether trying again later may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Status { .. } | Self::InFlight)
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages() {
        let err = AnalysisError::Network("connection refused".to_string());
        assert!(err.user_message().contains("connection"));
        assert!(err.is_retryable());

        let err = AnalysisError::Rejected("bad data".to_string());
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "analysis was rejected: bad data");
    }
}
