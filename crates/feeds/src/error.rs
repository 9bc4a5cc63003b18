//! Error types for market-data fetching.

use thiserror::Error;

/// Errors that can occur while fetching order books or forex quotes.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),

    #[error("failed to parse response: {0}")]
    ParseError(String),

    #[error("venue not supported: {0}")]
    UnsupportedVenue(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            FeedError::HttpStatus(status.as_u16())
        } else {
            FeedError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::ParseError(err.to_string())
    }
}

impl FeedError {
    /// Returns true if this error is transient and likely to succeed on retry.
    /// This is the default retryable predicate of a retry policy.
    pub fn is_transient(&self) -> bool {
        match self {
            FeedError::ConnectionFailed(_) | FeedError::Timeout(_) | FeedError::RateLimited => true,
            FeedError::HttpStatus(status) => *status == 429 || *status >= 500,
            FeedError::ParseError(_) | FeedError::UnsupportedVenue(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(FeedError::ConnectionFailed("reset".into()).is_transient());
        assert!(FeedError::Timeout("10s".into()).is_transient());
        assert!(FeedError::RateLimited.is_transient());
        assert!(FeedError::HttpStatus(503).is_transient());
        assert!(FeedError::HttpStatus(429).is_transient());
        assert!(!FeedError::HttpStatus(404).is_transient());
        assert!(!FeedError::ParseError("bad json".into()).is_transient());
        assert!(!FeedError::UnsupportedVenue("x".into()).is_transient());
    }
}
