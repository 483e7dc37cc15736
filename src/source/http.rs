//! HTTP status source backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::trace;

use super::{ProbeError, ProbeMethod, ProbeResponse, StatusSource};

/// Default base URL: the nginx instance on the local host.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1";

/// A status source that talks HTTP to a single host.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: Url,
    timeout: Option<Duration>,
    description: String,
}

impl HttpSource {
    /// Create a new builder for configuring the source.
    pub fn builder() -> HttpSourceBuilder {
        HttpSourceBuilder::default()
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The per-request timeout, `None` when requests may wait indefinitely.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn url_for(&self, path: &str) -> Result<Url, ProbeError> {
        self.base_url
            .join(path)
            .map_err(|e| ProbeError::InvalidUrl(format!("{}: {}", path, e)))
    }
}

#[async_trait]
impl StatusSource for HttpSource {
    async fn request(&self, method: ProbeMethod, path: &str) -> Result<ProbeResponse, ProbeError> {
        let url = self.url_for(path)?;
        trace!(%method, %url, "sending request");

        let request = match method {
            ProbeMethod::Get => self.client.get(url),
            ProbeMethod::Head => self.client.head(url),
        };
        let response = request.send().await?;
        let status = response.status().as_u16();

        let body = match method {
            ProbeMethod::Get => response.text().await?,
            ProbeMethod::Head => String::new(),
        };

        Ok(ProbeResponse { status, body })
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for HttpSource.
#[derive(Debug, Default)]
pub struct HttpSourceBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl HttpSourceBuilder {
    /// Set the host to probe (e.g., "http://localhost:8080").
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout (default: none). Zero also means none.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the source.
    pub fn build(self) -> Result<HttpSource, ProbeError> {
        let raw = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(raw.trim_end_matches('/'))
            .map_err(|e| ProbeError::InvalidUrl(format!("{}: {}", raw, e)))?;

        let timeout = self.timeout.filter(|t| !t.is_zero());
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| concat!("statuspanel/", env!("CARGO_PKG_VERSION")).to_string());

        let mut client = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            client = client.timeout(timeout);
        }
        let client = client.build()?;

        let description = format!("http: {}", base_url.as_str().trim_end_matches('/'));

        Ok(HttpSource {
            client,
            base_url,
            timeout,
            description,
        })
    }
}
