//! Error types for status requests.

use thiserror::Error;

/// Errors that can occur while probing an endpoint.
///
/// The `Display` text is what ends up on screen after the error prefix of
/// the raw status slot, so it is kept short.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// Could not connect to the host.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("request timed out")]
    Timeout,

    /// Any other transport-level failure.
    #[error("request failed: {0}")]
    Http(String),

    /// The response body could not be read as text.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// The request completed with a non-2xx status.
    #[error("HTTP {0}")]
    Status(u16),

    /// The base URL and path do not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout
        } else if err.is_connect() {
            ProbeError::Connection(err.to_string())
        } else if err.is_body() || err.is_decode() {
            ProbeError::Body(err.to_string())
        } else if err.is_builder() {
            ProbeError::InvalidUrl(err.to_string())
        } else {
            ProbeError::Http(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(ProbeError::Timeout.to_string(), "request timed out");
        assert_eq!(ProbeError::Status(503).to_string(), "HTTP 503");
        assert_eq!(
            ProbeError::Connection("refused".to_string()).to_string(),
            "connection failed: refused"
        );
    }
}
