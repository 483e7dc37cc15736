//! Display slots written by a refresh cycle.
//!
//! The panel writes every result through the [`StatusDisplay`] trait rather
//! than into fixed global slots. [`PanelState`] is the plain set of slots;
//! [`ChannelDisplay`] publishes each write to a watch channel so the TUI can
//! render a cycle while it is still running.

use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::sync::watch;

use crate::data::{LivenessState, Sparkline, StubStatus};

/// Format used for the "last updated" slot.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sink for the results of a refresh cycle.
pub trait StatusDisplay: Send {
    /// Raw status text, or the error text of a failed fetch.
    fn set_raw_status(&mut self, kind: RawStatusKind, text: String);

    /// Time of the last successful raw status fetch.
    fn set_updated(&mut self, at: DateTime<Local>);

    /// Counters parsed from the raw status, `None` if it had none.
    fn set_connections(&mut self, status: Option<StubStatus>);

    fn set_api_status(&mut self, state: LivenessState);

    fn set_db_status(&mut self, state: LivenessState);

    fn set_sparkline(&mut self, sparkline: Sparkline);
}

/// Whether the last cycle's raw status fetch succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RawStatusKind {
    /// Nothing fetched yet.
    #[default]
    Empty,
    /// The slot holds the response body.
    Fetched,
    /// The slot holds an error text.
    Failed,
}

/// The complete set of display slots.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PanelState {
    pub raw_status: String,
    pub raw_kind: RawStatusKind,
    pub updated: Option<DateTime<Local>>,
    pub connections: Option<StubStatus>,
    pub api_status: LivenessState,
    pub db_status: LivenessState,
    #[serde(skip)]
    pub sparkline: Option<Sparkline>,
    /// Number of writes applied; lets watchers tell states apart cheaply.
    #[serde(skip)]
    pub revision: u64,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The "last updated" slot as text.
    pub fn updated_text(&self) -> String {
        self.updated
            .map(|at| at.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_else(|| "never".to_string())
    }

    /// Export the slots as a JSON value, with the sparkline rendered as SVG.
    pub fn to_json(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
        if let serde_json::Value::Object(ref mut map) = value {
            map.insert("updated".to_string(), serde_json::json!(self.updated_text()));
            map.insert(
                "sparkline".to_string(),
                self.sparkline.as_ref().map_or(serde_json::Value::Null, |s| {
                    serde_json::json!({ "points": s.points(), "svg": s.to_svg() })
                }),
            );
        }
        value
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl StatusDisplay for PanelState {
    fn set_raw_status(&mut self, kind: RawStatusKind, text: String) {
        self.raw_kind = kind;
        self.raw_status = text;
        self.touch();
    }

    fn set_updated(&mut self, at: DateTime<Local>) {
        self.updated = Some(at);
        self.touch();
    }

    fn set_connections(&mut self, status: Option<StubStatus>) {
        self.connections = status;
        self.touch();
    }

    fn set_api_status(&mut self, state: LivenessState) {
        self.api_status = state;
        self.touch();
    }

    fn set_db_status(&mut self, state: LivenessState) {
        self.db_status = state;
        self.touch();
    }

    fn set_sparkline(&mut self, sparkline: Sparkline) {
        self.sparkline = Some(sparkline);
        self.touch();
    }
}

/// A display that publishes every slot write through a watch channel.
///
/// # Example
///
/// ```
/// use statuspanel::{ChannelDisplay, LivenessState, StatusDisplay};
///
/// let (mut display, mut watcher) = ChannelDisplay::create();
/// display.set_api_status(LivenessState::Online);
/// assert_eq!(watcher.poll().unwrap().api_status, LivenessState::Online);
/// ```
#[derive(Debug, Clone)]
pub struct ChannelDisplay {
    sender: watch::Sender<PanelState>,
}

impl ChannelDisplay {
    /// Create a display and the watcher that observes it.
    pub fn create() -> (Self, PanelWatcher) {
        let (tx, rx) = watch::channel(PanelState::default());
        (Self { sender: tx }, PanelWatcher::new(rx))
    }

    /// Applies the write even when no watcher is left.
    fn update(&mut self, apply: impl FnOnce(&mut PanelState)) {
        self.sender.send_modify(apply);
    }
}

impl StatusDisplay for ChannelDisplay {
    fn set_raw_status(&mut self, kind: RawStatusKind, text: String) {
        self.update(|s| s.set_raw_status(kind, text));
    }

    fn set_updated(&mut self, at: DateTime<Local>) {
        self.update(|s| s.set_updated(at));
    }

    fn set_connections(&mut self, status: Option<StubStatus>) {
        self.update(|s| s.set_connections(status));
    }

    fn set_api_status(&mut self, state: LivenessState) {
        self.update(|s| s.set_api_status(state));
    }

    fn set_db_status(&mut self, state: LivenessState) {
        self.update(|s| s.set_db_status(state));
    }

    fn set_sparkline(&mut self, sparkline: Sparkline) {
        self.update(|s| s.set_sparkline(sparkline));
    }
}

/// Receiving side of a [`ChannelDisplay`].
#[derive(Debug)]
pub struct PanelWatcher {
    receiver: watch::Receiver<PanelState>,
    /// Revision returned by the previous poll, `None` before the first poll.
    last_revision: Option<u64>,
}

impl PanelWatcher {
    fn new(receiver: watch::Receiver<PanelState>) -> Self {
        Self {
            receiver,
            last_revision: None,
        }
    }

    /// Poll for the latest state without blocking.
    ///
    /// Returns `Some(state)` on the first call and whenever slots changed
    /// since the previous poll, `None` otherwise. Writes made just before
    /// every display was dropped are still delivered.
    pub fn poll(&mut self) -> Option<PanelState> {
        let state = self.receiver.borrow_and_update();
        if self.last_revision == Some(state.revision) {
            return None;
        }
        self.last_revision = Some(state.revision);
        Some(state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_state_defaults() {
        let state = PanelState::new();
        assert!(state.raw_status.is_empty());
        assert_eq!(state.raw_kind, RawStatusKind::Empty);
        assert_eq!(state.api_status, LivenessState::Unknown);
        assert_eq!(state.db_status, LivenessState::Unknown);
        assert_eq!(state.updated_text(), "never");
        assert!(state.sparkline.is_none());
    }

    #[test]
    fn test_setters_bump_revision() {
        let mut state = PanelState::new();
        state.set_api_status(LivenessState::Online);
        state.set_db_status(LivenessState::Offline);
        assert_eq!(state.revision, 2);
        assert_eq!(state.api_status, LivenessState::Online);
        assert_eq!(state.db_status, LivenessState::Offline);
    }

    #[test]
    fn test_to_json() {
        let mut state = PanelState::new();
        state.set_raw_status(RawStatusKind::Fetched, "Active connections: 1".to_string());
        state.set_api_status(LivenessState::Online);
        state.set_sparkline(Sparkline::from_points(vec![10, 20]));

        let json = state.to_json();
        assert_eq!(json["raw_status"], "Active connections: 1");
        assert_eq!(json["raw_kind"], "fetched");
        assert_eq!(json["api_status"], "online");
        assert_eq!(json["db_status"], "unknown");
        assert_eq!(json["updated"], "never");
        assert_eq!(json["sparkline"]["points"], serde_json::json!([10, 20]));
        assert!(json["sparkline"]["svg"].as_str().unwrap().starts_with("<svg"));
        assert!(json.get("revision").is_none());
    }

    #[test]
    fn test_watcher_initial_and_changes() {
        let (mut display, mut watcher) = ChannelDisplay::create();

        // Initial (empty) state is returned once
        let initial = watcher.poll().unwrap();
        assert_eq!(initial.revision, 0);
        assert!(watcher.poll().is_none());

        display.set_raw_status(RawStatusKind::Fetched, "hello".to_string());
        display.set_db_status(LivenessState::Online);

        // Both writes are visible in one poll
        let state = watcher.poll().unwrap();
        assert_eq!(state.raw_status, "hello");
        assert_eq!(state.db_status, LivenessState::Online);
        assert_eq!(state.revision, 2);
        assert!(watcher.poll().is_none());
    }

    #[test]
    fn test_watcher_sees_writes_after_display_dropped() {
        let (mut display, mut watcher) = ChannelDisplay::create();
        assert!(watcher.poll().is_some());

        display.set_api_status(LivenessState::Online);
        drop(display);

        let state = watcher.poll().unwrap();
        assert_eq!(state.api_status, LivenessState::Online);
        assert!(watcher.poll().is_none());
    }

    #[test]
    fn test_display_survives_dropped_watcher() {
        let (mut display, watcher) = ChannelDisplay::create();
        drop(watcher);
        display.set_api_status(LivenessState::Offline);
    }
}
