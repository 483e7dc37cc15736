//! The refresh sequence.
//!
//! [`StatusPanel::run`] fetches the raw status, probes the API and the admin
//! interface, then renders the placeholder sparkline. The three requests are
//! awaited strictly one after another. A failing step writes its fallback
//! text and the sequence carries on.

use std::fmt;
use std::time::{Duration, Instant};

use chrono::Local;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::data::duration::format_duration;
use crate::data::{LivenessState, Sparkline, StubStatus};
use crate::display::{RawStatusKind, StatusDisplay};
use crate::source::{ProbeError, ProbeMethod, StatusSource};

/// Prefix of the raw status slot when the fetch failed.
pub const ERROR_PREFIX: &str = "Ошибка: ";

/// Paths probed by the panel, relative to the source's host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// nginx stub_status page, fetched with GET.
    pub raw_status: String,
    /// API root, probed with GET.
    pub api: String,
    /// Admin interface, probed with HEAD as a stand-in for the database.
    pub admin: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            raw_status: "/status/raw".to_string(),
            api: "/api/v1/".to_string(),
            admin: "/admin".to_string(),
        }
    }
}

/// Summary of one refresh cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshReport {
    /// Error text of the raw status fetch, `None` if it succeeded.
    pub raw_error: Option<String>,
    /// Active connections parsed from the raw status.
    pub active_connections: Option<u64>,
    pub api: LivenessState,
    pub db: LivenessState,
    pub elapsed: Duration,
}

impl RefreshReport {
    pub fn raw_ok(&self) -> bool {
        self.raw_error.is_none()
    }
}

impl fmt::Display for RefreshReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw_error {
            None => write!(f, "raw: ok")?,
            Some(e) => write!(f, "raw: {}", e)?,
        }
        if let Some(active) = self.active_connections {
            write!(f, " ({} active)", active)?;
        }
        write!(
            f,
            " | api: {} | db: {} | {}",
            self.api,
            self.db,
            format_duration(self.elapsed)
        )
    }
}

/// Runs the refresh sequence against a [`StatusSource`].
///
/// # Example
///
/// ```no_run
/// use statuspanel::{Endpoints, HttpSource, PanelState, StatusPanel};
///
/// # tokio_test::block_on(async {
/// let source = HttpSource::builder().base_url("http://127.0.0.1").build().unwrap();
/// let panel = StatusPanel::new(source, Endpoints::default());
///
/// let mut state = PanelState::new();
/// let report = panel.run(&mut state).await;
/// println!("{}", report);
/// # });
/// ```
#[derive(Debug)]
pub struct StatusPanel<S> {
    source: S,
    endpoints: Endpoints,
}

impl<S: StatusSource> StatusPanel<S> {
    pub fn new(source: S, endpoints: Endpoints) -> Self {
        Self { source, endpoints }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Fetch the raw status page into the raw status slot.
    ///
    /// On success also fills the connections and updated slots and returns
    /// the body. On failure writes the error text, clears the connections
    /// slot, resets both liveness slots to `unknown` and returns `None`. A non-2xx response counts as a
    /// failure.
    pub async fn refresh_raw_status<D>(&self, display: &mut D) -> Option<String>
    where
        D: StatusDisplay + ?Sized,
    {
        self.try_refresh_raw_status(display).await.ok()
    }

    async fn try_refresh_raw_status<D>(&self, display: &mut D) -> Result<String, ProbeError>
    where
        D: StatusDisplay + ?Sized,
    {
        match self.fetch_text(&self.endpoints.raw_status).await {
            Ok(text) => {
                let connections = StubStatus::parse(&text);
                debug!(
                    path = %self.endpoints.raw_status,
                    bytes = text.len(),
                    active = ?connections.map(|c| c.active),
                    "raw status fetched"
                );
                display.set_raw_status(RawStatusKind::Fetched, text.clone());
                display.set_connections(connections);
                display.set_updated(Local::now());
                Ok(text)
            }
            Err(e) => {
                warn!(path = %self.endpoints.raw_status, error = %e, "raw status fetch failed");
                display.set_raw_status(RawStatusKind::Failed, format!("{}{}", ERROR_PREFIX, e));
                // Counters of an earlier body no longer match the raw slot
                display.set_connections(None);
                display.set_api_status(LivenessState::Unknown);
                display.set_db_status(LivenessState::Unknown);
                Err(e)
            }
        }
    }

    /// Probe the API with GET and write the API slot.
    pub async fn check_api_liveness<D>(&self, display: &mut D) -> LivenessState
    where
        D: StatusDisplay + ?Sized,
    {
        let state = self.probe(ProbeMethod::Get, &self.endpoints.api).await;
        display.set_api_status(state);
        state
    }

    /// Probe the admin interface with HEAD and write the DB slot.
    ///
    /// The database is never contacted directly; the admin interface only
    /// answers when its database does.
    pub async fn check_db_liveness<D>(&self, display: &mut D) -> LivenessState
    where
        D: StatusDisplay + ?Sized,
    {
        let state = self.probe(ProbeMethod::Head, &self.endpoints.admin).await;
        display.set_db_status(state);
        state
    }

    /// Generate placeholder points and write the sparkline slot.
    pub fn render_sparkline<D, R>(&self, display: &mut D, rng: &mut R) -> Sparkline
    where
        D: StatusDisplay + ?Sized,
        R: Rng + ?Sized,
    {
        let sparkline = Sparkline::random(rng);
        display.set_sparkline(sparkline.clone());
        sparkline
    }

    /// Run the full sequence with a freshly seeded generator.
    pub async fn run<D>(&self, display: &mut D) -> RefreshReport
    where
        D: StatusDisplay + ?Sized,
    {
        let mut rng = StdRng::from_entropy();
        self.run_with_rng(display, &mut rng).await
    }

    /// Run the full sequence: raw status, API, DB, sparkline.
    pub async fn run_with_rng<D, R>(&self, display: &mut D, rng: &mut R) -> RefreshReport
    where
        D: StatusDisplay + ?Sized,
        R: Rng + Send + ?Sized,
    {
        let started = Instant::now();

        let raw = self.try_refresh_raw_status(display).await;
        let api = self.check_api_liveness(display).await;
        let db = self.check_db_liveness(display).await;
        self.render_sparkline(display, rng);

        let report = RefreshReport {
            raw_error: raw.as_ref().err().map(ToString::to_string),
            active_connections: raw.as_deref().ok().and_then(StubStatus::parse).map(|s| s.active),
            api,
            db,
            elapsed: started.elapsed(),
        };
        info!(source = self.source.description(), "{}", report);
        report
    }

    async fn fetch_text(&self, path: &str) -> Result<String, ProbeError> {
        let response = self.source.request(ProbeMethod::Get, path).await?;
        if !response.is_success() {
            return Err(ProbeError::Status(response.status));
        }
        Ok(response.body)
    }

    async fn probe(&self, method: ProbeMethod, path: &str) -> LivenessState {
        match self.source.request(method, path).await {
            Ok(response) => {
                let state = LivenessState::from_status(response.status);
                debug!(%method, path, status = response.status, %state, "probe answered");
                state
            }
            Err(e) => {
                warn!(%method, path, error = %e, "probe failed");
                LivenessState::Offline
            }
        }
    }
}
