//! Status source abstraction.
//!
//! A status source answers single HTTP-style requests against the monitored
//! host. Every request yields a value: either a [`ProbeResponse`] or a
//! [`ProbeError`]. Nothing is thrown, so each failure path of the refresh
//! sequence can be exercised with a fake source.

mod error;
mod http;

pub use error::ProbeError;
pub use http::{HttpSource, HttpSourceBuilder, DEFAULT_BASE_URL};

use std::fmt::{self, Debug};

use async_trait::async_trait;

/// Request method used by a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeMethod {
    Get,
    Head,
}

impl fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeMethod::Get => f.write_str("GET"),
            ProbeMethod::Head => f.write_str("HEAD"),
        }
    }
}

/// A completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body. Always empty for `HEAD`.
    pub body: String,
}

impl ProbeResponse {
    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for issuing requests against the monitored host.
///
/// # Example
///
/// ```no_run
/// use statuspanel::{HttpSource, ProbeMethod, StatusSource};
///
/// # tokio_test::block_on(async {
/// let source = HttpSource::builder().base_url("http://127.0.0.1").build().unwrap();
/// let response = source.request(ProbeMethod::Get, "/status/raw").await;
/// # });
/// ```
#[async_trait]
pub trait StatusSource: Send + Sync + Debug {
    /// Issue a request for `path`, relative to the source's host.
    ///
    /// Transport failures are returned as `Err`. Any completed response,
    /// whatever its status, is returned as `Ok`.
    async fn request(&self, method: ProbeMethod, path: &str) -> Result<ProbeResponse, ProbeError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;
}

#[async_trait]
impl<S: StatusSource + ?Sized> StatusSource for Box<S> {
    async fn request(&self, method: ProbeMethod, path: &str) -> Result<ProbeResponse, ProbeError> {
        (**self).request(method, path).await
    }

    fn description(&self) -> &str {
        (**self).description()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success() {
        let ok = ProbeResponse { status: 200, body: String::new() };
        let no_content = ProbeResponse { status: 204, body: String::new() };
        let redirect = ProbeResponse { status: 302, body: String::new() };
        let down = ProbeResponse { status: 503, body: "busy".to_string() };
        assert!(ok.is_success());
        assert!(no_content.is_success());
        assert!(!redirect.is_success());
        assert!(!down.is_success());
    }

    #[test]
    fn test_method_display() {
        assert_eq!(ProbeMethod::Get.to_string(), "GET");
        assert_eq!(ProbeMethod::Head.to_string(), "HEAD");
    }
}
