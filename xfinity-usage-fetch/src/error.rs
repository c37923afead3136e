//! Fetch error types.

use reqwest::StatusCode;
use thiserror::Error;
use xfinity_usage_core::FetchStage;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for the login-and-fetch flow.
#[derive(Debug, Error)]
pub enum FetchError {
    /// A step answered with something other than HTTP 200.
    #[error("{stage} request returned HTTP {status}")]
    Status {
        /// Step that failed.
        stage: FetchStage,
        /// Status code received.
        status: StatusCode,
    },

    /// A response body could not be parsed (token page or usage JSON).
    #[error("{stage} response could not be parsed: {detail}")]
    Parse {
        /// Step that failed.
        stage: FetchStage,
        /// What was wrong with the body.
        detail: String,
    },

    /// The usage JSON parsed but the expected fields were missing or mistyped.
    #[error("Usage data extraction failed: {0}")]
    Extraction(String),

    /// The login form came back instead of the account page.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The request itself failed (connection, TLS, body read).
    #[error("{stage} request failed: {source}")]
    Transport {
        /// Step that failed.
        stage: FetchStage,
        /// Underlying HTTP error.
        #[source]
        source: HttpError,
    },

    /// The HTTP session could not be set up.
    #[error("HTTP client error: {0}")]
    Client(#[from] HttpError),
}

impl FetchError {
    /// Wraps an HTTP error raised during `stage`.
    pub fn transport(stage: FetchStage, source: impl Into<HttpError>) -> Self {
        Self::Transport {
            stage,
            source: source.into(),
        }
    }

    /// Returns the step this error belongs to.
    ///
    /// Extraction failures belong to the usage step; authentication failures
    /// to the login step. Session setup errors have no step.
    pub fn stage(&self) -> Option<FetchStage> {
        match self {
            Self::Status { stage, .. } | Self::Parse { stage, .. } | Self::Transport { stage, .. } => {
                Some(*stage)
            }
            Self::Extraction(_) => Some(FetchStage::Usage),
            Self::AuthenticationFailed(_) => Some(FetchStage::Login),
            Self::Client(_) => None,
        }
    }

    /// Returns the HTTP status for non-200 responses.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns a short label for the kind of failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Status { .. } => "status",
            Self::Parse { .. } => "parse",
            Self::Extraction(_) => "extraction",
            Self::AuthenticationFailed(_) => "authentication",
            Self::Transport { .. } => "transport",
            Self::Client(_) => "client",
        }
    }
}

// ============================================================================
// HTTP Error
// ============================================================================

/// HTTP-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_and_status() {
        let err = FetchError::Status {
            stage: FetchStage::Token,
            status: StatusCode::SERVICE_UNAVAILABLE,
        };
        assert_eq!(err.stage(), Some(FetchStage::Token));
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(err.to_string(), "token request returned HTTP 503 Service Unavailable");
    }

    #[test]
    fn test_extraction_belongs_to_usage_stage() {
        let err = FetchError::Extraction("usageMonths is empty".to_string());
        assert_eq!(err.stage(), Some(FetchStage::Usage));
        assert!(err.status().is_none());
        assert_eq!(err.kind(), "extraction");
    }

    #[test]
    fn test_client_error_has_no_stage() {
        let err = FetchError::from(HttpError::InvalidUrl("nope".to_string()));
        assert!(err.stage().is_none());
    }
}
