//! Application state for the TUI.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{error, info};

use crate::display::{ChannelDisplay, PanelState, PanelWatcher};
use crate::panel::{RefreshReport, StatusPanel};
use crate::source::StatusSource;
use crate::ui::Theme;

/// How long a status message stays in the status bar.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// The panel as driven by the TUI: any boxed source.
pub type DynPanel = StatusPanel<Box<dyn StatusSource>>;

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    // Refresh machinery
    panel: Arc<DynPanel>,
    runtime: Handle,
    display: ChannelDisplay,
    watcher: PanelWatcher,
    /// Delivers the report of the in-flight refresh.
    refresh_task: Option<oneshot::Receiver<RefreshReport>>,

    /// Latest slot values, as published by the running or last refresh.
    pub state: PanelState,
    pub last_report: Option<RefreshReport>,
    pub refresh_count: u64,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App. Refresh tasks are spawned on `runtime`.
    pub fn new(panel: DynPanel, runtime: Handle) -> Self {
        Self::with_theme(panel, runtime, Theme::auto_detect())
    }

    /// Create a new App with an explicit theme.
    pub fn with_theme(panel: DynPanel, runtime: Handle, theme: Theme) -> Self {
        let (display, watcher) = ChannelDisplay::create();
        Self {
            running: true,
            show_help: false,
            panel: Arc::new(panel),
            runtime,
            display,
            watcher,
            refresh_task: None,
            state: PanelState::new(),
            last_report: None,
            refresh_count: 0,
            theme,
            status_message: None,
        }
    }

    /// Returns a description of the probed host.
    pub fn source_description(&self) -> &str {
        self.panel.source().description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// True while a refresh task is in flight.
    pub fn is_refreshing(&self) -> bool {
        self.refresh_task.is_some()
    }

    /// Start a refresh cycle in the background.
    ///
    /// Returns false (and leaves a status message) if one is already running.
    pub fn start_refresh(&mut self) -> bool {
        if self.is_refreshing() {
            self.set_status_message("Refresh already in progress".to_string());
            return false;
        }

        let panel = Arc::clone(&self.panel);
        let mut display = self.display.clone();
        let (tx, rx) = oneshot::channel();
        self.runtime.spawn(async move {
            let report = panel.run(&mut display).await;
            // The app may already be gone
            let _ = tx.send(report);
        });
        self.refresh_task = Some(rx);
        self.refresh_count += 1;
        info!(cycle = self.refresh_count, "refresh started");
        true
    }

    /// Pull published slot writes and collect a finished refresh.
    ///
    /// Called once per frame by the main loop. Never blocks.
    pub fn tick(&mut self) {
        if let Some(state) = self.watcher.poll() {
            self.state = state;
        }

        let Some(task) = self.refresh_task.as_mut() else {
            return;
        };

        match task.try_recv() {
            Err(TryRecvError::Empty) => return,
            Ok(report) => {
                self.set_status_message(format!("Refreshed: {}", report));
                self.last_report = Some(report);
            }
            Err(TryRecvError::Closed) => {
                error!("refresh task ended without a report");
                self.set_status_message("Refresh failed".to_string());
            }
        }
        self.refresh_task = None;

        // Writes made right before the task ended
        if let Some(state) = self.watcher.poll() {
            self.state = state;
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current slots to `path` (JSON) and the sparkline next to it (SVG).
    ///
    /// Returns the paths written.
    pub fn export_state(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if self.state.revision == 0 {
            anyhow::bail!("No data to export");
        }

        let mut written = Vec::new();

        let json = serde_json::to_string_pretty(&self.state.to_json())?;
        std::fs::write(path, json).with_context(|| format!("Writing {}", path.display()))?;
        written.push(path.to_path_buf());

        if let Some(ref sparkline) = self.state.sparkline {
            let svg_path = path.with_extension("svg");
            std::fs::write(&svg_path, sparkline.to_svg())
                .with_context(|| format!("Writing {}", svg_path.display()))?;
            written.push(svg_path);
        }

        Ok(written)
    }
}
