//! Error types for the gnews crate.
//!
//! Only [`NewsError`] ever reaches the caller of a search. Per-entry
//! [`ResolveError`]s are absorbed by the coordinator and turned into
//! fallback articles.

use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Batch-level errors surfaced to callers
#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    /// Rejected before any network call was attempted
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The feed endpoint answered HTTP 429. No retry is attempted.
    #[error("Rate limit exceeded while fetching news")]
    RateLimited,

    /// Transport error, timeout, non-success status or unparsable feed
    #[error("Network failure: {message}")]
    NetworkFailure {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl NewsError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        NewsError::InvalidConfig(message.into())
    }

    /// Network failure without an underlying error value
    pub fn network(message: impl Into<String>) -> Self {
        NewsError::NetworkFailure {
            message: message.into(),
            source: None,
        }
    }

    /// Network failure wrapping its cause
    pub fn network_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        NewsError::NetworkFailure {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, NewsError::RateLimited)
    }
}

impl From<reqwest::Error> for NewsError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else {
            err.to_string()
        };
        NewsError::network_with(message, err)
    }
}

impl From<quick_xml::DeError> for NewsError {
    fn from(err: quick_xml::DeError) -> Self {
        NewsError::network_with("failed to parse feed", err)
    }
}

impl From<crate::utils::ValidationError> for NewsError {
    fn from(err: crate::utils::ValidationError) -> Self {
        NewsError::InvalidConfig(err.to_string())
    }
}

/// Per-entry URL resolution failures
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// The decode page carried no signature/timestamp attributes
    #[error("Decode parameters not found in article page")]
    SignatureNotFound,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for ResolveError {
    fn from(err: reqwest::Error) -> Self {
        ResolveError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ResolveError {
    fn from(err: serde_json::Error) -> Self {
        ResolveError::MalformedResponse(format!("JSON: {}", err))
    }
}

/// Failures reported by an [`ArticleExtractor`](crate::news::ArticleExtractor)
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Failed to download article: {0}")]
    Download(String),

    #[error("Failed to parse article: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_config() {
        let err = NewsError::invalid_config("max_results must be greater than 0");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: max_results must be greater than 0"
        );
    }

    #[test]
    fn network_failure_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = NewsError::network_with("feed request failed", io);
        assert_eq!(err.to_string(), "Network failure: feed request failed");
        assert!(StdError::source(&err).is_some());
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NewsError>();
        assert_send_sync::<ResolveError>();
    }
}
