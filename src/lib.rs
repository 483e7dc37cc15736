//! # statuspanel
//!
//! A terminal status panel for an nginx-fronted service.
//!
//! One refresh cycle fetches the nginx `stub_status` text, probes the API
//! root and the admin interface for liveness, and draws a placeholder trend
//! sparkline. Results are written to a set of display slots that a terminal
//! UI renders, or that a one-shot run prints and exports.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│ display  │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │ (slots)  │    │(rendering)   │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │              ▲                                      │
//! │       ▼              │ writes                               │
//! │  ┌─────────┐    ┌────┴─────┐                                │
//! │  │  panel  │───▶│  source  │◀── HttpSource (reqwest)        │
//! │  │ (cycle) │    │ (probes) │                                │
//! │  └─────────┘    └──────────┘                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`panel`]**: The refresh sequence ([`StatusPanel`])
//! - **[`source`]**: HTTP access behind the [`StatusSource`] trait
//! - **[`display`]**: Display slots ([`StatusDisplay`] trait, [`PanelState`],
//!   [`ChannelDisplay`])
//! - **[`data`]**: Liveness states, `stub_status` parsing, sparkline, durations
//! - **[`settings`]**: Layered configuration
//! - **[`app`]**, **[`events`]**, **[`ui`]**: The interactive terminal UI
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Interactive panel against a local nginx
//! statuspanel --base-url http://127.0.0.1:8080
//!
//! # One cycle, printed to stdout, with the sparkline saved as SVG
//! statuspanel --once --svg trend.svg
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use statuspanel::{Endpoints, HttpSource, PanelState, StatusPanel};
//!
//! # tokio_test::block_on(async {
//! let source = HttpSource::builder()
//!     .base_url("http://127.0.0.1:8080")
//!     .build()
//!     .unwrap();
//! let panel = StatusPanel::new(source, Endpoints::default());
//!
//! let mut state = PanelState::new();
//! let report = panel.run(&mut state).await;
//! println!("{report}");
//! # });
//! ```
//!
//! ### Observing a running cycle
//!
//! ```
//! use statuspanel::{ChannelDisplay, LivenessState, StatusDisplay};
//!
//! let (mut display, mut watcher) = ChannelDisplay::create();
//! display.set_db_status(LivenessState::Offline);
//!
//! let state = watcher.poll().unwrap();
//! assert_eq!(state.db_status, LivenessState::Offline);
//! ```

pub mod app;
pub mod data;
pub mod display;
pub mod events;
pub mod panel;
pub mod settings;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use data::{LivenessState, Sparkline, StubStatus};
pub use display::{ChannelDisplay, PanelState, PanelWatcher, RawStatusKind, StatusDisplay};
pub use panel::{Endpoints, RefreshReport, StatusPanel, ERROR_PREFIX};
pub use settings::Settings;
pub use source::{HttpSource, ProbeError, ProbeMethod, ProbeResponse, StatusSource};
