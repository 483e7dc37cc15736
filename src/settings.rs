//! Settings for the panel.
//!
//! Layered from lowest to highest precedence: built-in defaults, an optional
//! TOML file, `STATUSPANEL_*` environment variables, then command line flags.
//!
//! ```toml
//! base_url = "http://127.0.0.1:8080"
//! raw_status_path = "/status/raw"
//! api_path = "/api/v1/"
//! admin_path = "/admin"
//! timeout = "10s"   # default "0s": no timeout
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::duration::parse_duration;
use crate::panel::Endpoints;
use crate::source::{HttpSource, DEFAULT_BASE_URL};

/// Prefix of the environment variables read by [`Settings::load`].
pub const ENV_PREFIX: &str = "STATUSPANEL";

/// Resolved panel settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Host the endpoints are resolved against.
    pub base_url: String,
    pub raw_status_path: String,
    pub api_path: String,
    pub admin_path: String,
    /// Per-request timeout, e.g. "10s" or "500ms". "0s" (the default) disables it.
    pub timeout: String,
}

impl Default for Settings {
    fn default() -> Self {
        let endpoints = Endpoints::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            raw_status_path: endpoints.raw_status,
            api_path: endpoints.api,
            admin_path: endpoints.admin,
            timeout: "0s".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from an optional file and the process environment.
    ///
    /// A file that is named explicitly must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_from(path: Option<&Path>, environment: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(environment)
            .build()
            .with_context(|| match path {
                Some(p) => format!("Failed to load config from {}", p.display()),
                None => "Failed to load config from environment".to_string(),
            })?;

        let settings: Settings = config.try_deserialize().context("Invalid configuration")?;
        settings.timeout()?;
        Ok(settings)
    }

    /// Apply command line overrides on top of the loaded settings.
    pub fn with_overrides(mut self, base_url: Option<String>, timeout: Option<String>) -> Self {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if let Some(timeout) = timeout {
            self.timeout = timeout;
        }
        self
    }

    /// The parsed request timeout.
    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(&self.timeout).with_context(|| format!("Invalid timeout: {}", self.timeout))
    }

    /// The probed paths.
    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            raw_status: self.raw_status_path.clone(),
            api: self.api_path.clone(),
            admin: self.admin_path.clone(),
        }
    }

    /// Build the HTTP source these settings describe.
    pub fn http_source(&self) -> Result<HttpSource> {
        let source = HttpSource::builder()
            .base_url(&self.base_url)
            .timeout(self.timeout()?)
            .build()
            .with_context(|| format!("Cannot probe {}", self.base_url))?;
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let mut map = config::Map::new();
        for (k, v) in vars {
            map.insert(k.to_string(), v.to_string());
        }
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    fn toml_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load_from(None, env(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.base_url, "http://127.0.0.1");
        assert_eq!(settings.timeout().unwrap(), Duration::ZERO);
        assert_eq!(settings.http_source().unwrap().timeout(), None);
        assert_eq!(settings.endpoints(), Endpoints::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = toml_file(
            r#"
            base_url = "http://panel.local:8080"
            raw_status_path = "/nginx_status"
            timeout = "2s"
            "#,
        );

        let settings = Settings::load_from(Some(file.path()), env(&[])).unwrap();

        assert_eq!(settings.base_url, "http://panel.local:8080");
        assert_eq!(settings.raw_status_path, "/nginx_status");
        assert_eq!(settings.api_path, "/api/v1/");
        assert_eq!(settings.timeout().unwrap(), Duration::from_secs(2));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = toml_file("base_url = \"http://from-file\"\n");

        let settings = Settings::load_from(
            Some(file.path()),
            env(&[("STATUSPANEL_BASE_URL", "http://from-env"), ("STATUSPANEL_ADMIN_PATH", "/adm")]),
        )
        .unwrap();

        assert_eq!(settings.base_url, "http://from-env");
        assert_eq!(settings.admin_path, "/adm");
    }

    #[test]
    fn test_cli_overrides_everything() {
        let settings = Settings::load_from(None, env(&[("STATUSPANEL_TIMEOUT", "3s")]))
            .unwrap()
            .with_overrides(Some("http://from-cli".to_string()), Some("250ms".to_string()));

        assert_eq!(settings.base_url, "http://from-cli");
        assert_eq!(settings.timeout().unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = Settings::load_from(Some(Path::new("/nonexistent/statuspanel.toml")), env(&[]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let result = Settings::load_from(None, env(&[("STATUSPANEL_TIMEOUT", "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_http_source_from_settings() {
        let settings = Settings::default().with_overrides(Some("http://10.0.0.5:81".to_string()), None);
        let source = settings.http_source().unwrap();
        assert_eq!(source.base_url().as_str(), "http://10.0.0.5:81/");
    }
}
