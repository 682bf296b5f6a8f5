//! HTTP client for the analysis endpoint.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AnalysisError, Result};
use crate::wire::{ANALYZE_ENDPOINT, AnalysisRequest, AnalysisResponse};

const USER_AGENT_VALUE: &str = concat!("roster/", env!("CARGO_PKG_VERSION"));

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Longest error body echoed back in [`AnalysisError::Status`].
const MAX_ERROR_BODY: usize = 200;

/// Anything that can turn an analysis request into analysis text.
pub trait AnalysisBackend {
    fn analyze(&self, request: &AnalysisRequest) -> Result<String>;
}

/// Where the analysis endpoint lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AnalysisSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Blocking client posting requests to `{base_url}/api/ai/analyze-qr-wizard`.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    client: Client,
    endpoint: String,
}

impl AnalysisClient {
    pub fn new(settings: &AnalysisSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| AnalysisError::Network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: format!(
                "{}{ANALYZE_ENDPOINT}",
                settings.base_url.trim_end_matches('/')
            ),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl AnalysisBackend for AnalysisClient {
    fn analyze(&self, request: &AnalysisRequest) -> Result<String> {
        debug!(
            endpoint = %self.endpoint,
            participants = request.data.participant_count,
            "requesting analysis"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "analysis endpoint returned an error");
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                message: truncate(&body, MAX_ERROR_BODY),
            });
        }

        let decoded: AnalysisResponse =
            serde_json::from_str(&body).map_err(|e| AnalysisError::Decode(e.to_string()))?;
        match decoded {
            AnalysisResponse {
                success: true,
                analysis: Some(analysis),
                ..
            } => {
                info!(length = analysis.len(), "analysis received");
                Ok(analysis)
            }
            AnalysisResponse { success: true, .. } => Err(AnalysisError::Decode(
                "response has no analysis text".to_string(),
            )),
            AnalysisResponse { error, .. } => {
                let message = error.unwrap_or_else(|| "analysis failed".to_string());
                warn!(%message, "analysis rejected");
                Err(AnalysisError::Rejected(message))
            }
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_url() {
        let client = AnalysisClient::new(&AnalysisSettings {
            base_url: "https://example.org/".to_string(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.org/api/ai/analyze-qr-wizard"
        );
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        assert_eq!(truncate("  short  ", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }
}
