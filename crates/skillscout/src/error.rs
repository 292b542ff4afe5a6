//! Error types for the skillscout pipeline
//!
//! The taxonomy mirrors how failures are handled: `NotFound` is terminal for
//! the item, `RateLimited`/`Transient`/`Timeout` degrade the item without
//! retrying inside the request, and `Validation` is the only class that
//! surfaces to the caller as an error response.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for operations that can fail with a pipeline error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the skillscout pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Requested skill, repository, or path does not exist (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream host is throttling us (403/429).
    ///
    /// Never retried within the same request; the affected item is served
    /// degraded instead.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Transport-level failure: connection error, 5xx, or any other
    /// status we don't model explicitly.
    #[error("Transient error: {0}")]
    Transient(String),

    /// An outbound call exceeded its independent timeout.
    ///
    /// Handled identically to [`Error::Transient`].
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// Caller-supplied parameters are invalid (empty query, limit out of
    /// bounds, malformed repository identifier).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid URL provided for a host endpoint.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP client configuration or initialization error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new `NotFound` error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new `RateLimited` error.
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a new `Transient` error.
    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Transient(msg.into())
    }

    /// Create a new `Validation` error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Map an HTTP status code from an upstream host to an error.
    ///
    /// - 404 → [`Error::NotFound`]
    /// - 403/429 → [`Error::RateLimited`] (GitHub reports rate limiting as
    ///   403 with a rate-limit header, other hosts use 429)
    /// - anything else → [`Error::Transient`]
    #[must_use]
    pub fn from_status(status: reqwest::StatusCode, context: &str) -> Self {
        match status.as_u16() {
            404 => Self::NotFound(context.to_string()),
            403 | 429 => Self::RateLimited(format!("{context} (status {status})")),
            _ => Self::Transient(format!("{context} (status {status})")),
        }
    }

    /// Map a transport-level failure to an error.
    ///
    /// Timeouts get their own variant so the configured deadline shows up
    /// in the message; everything else is transient.
    #[must_use]
    pub fn from_transport(error: &reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Transient(error.to_string())
        }
    }

    /// True if the error means the target does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// True if the failure is transient: a later identical request might
    /// succeed (throttling, timeout, transport).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited(_) | Self::Transient(_) | Self::Timeout(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_mapping() {
        let err = Error::from_status(reqwest::StatusCode::NOT_FOUND, "repo/file");
        assert!(err.is_not_found());

        let err = Error::from_status(reqwest::StatusCode::FORBIDDEN, "repo/file");
        assert!(matches!(err, Error::RateLimited(_)));

        let err = Error::from_status(reqwest::StatusCode::TOO_MANY_REQUESTS, "repo/file");
        assert!(matches!(err, Error::RateLimited(_)));

        let err = Error::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "repo/file");
        assert!(matches!(err, Error::Transient(_)));
    }

    #[test]
    fn test_transience_classification() {
        assert!(Error::rate_limited("x").is_transient());
        assert!(Error::transient("x").is_transient());
        assert!(Error::Timeout(Duration::from_secs(10)).is_transient());
        assert!(!Error::not_found("x").is_transient());
        assert!(!Error::validation("x").is_transient());
    }

    #[test]
    fn test_error_messages() {
        let err = Error::validation("limit must be between 1 and 50");
        assert!(err.to_string().contains("limit"));

        let err = Error::Timeout(Duration::from_secs(10));
        assert!(err.to_string().contains("10s"));
    }
}
