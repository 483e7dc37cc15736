//! Data models for a refresh cycle.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "10s", "500ms")
//! - [`liveness`]: The `online | offline | unknown` indicator state
//! - [`sparkline`]: Placeholder trend data and its SVG rendering
//! - [`stub_status`]: Connection counters parsed from the nginx status page
//!
//! ## Data Flow
//!
//! ```text
//! GET /status/raw ──▶ body text ──▶ StubStatus::parse() ──▶ connections slot
//!                          └──────────────────────────────▶ raw status slot
//! GET /api/v1/    ──▶ status code ──▶ LivenessState ─────▶ api slot
//! HEAD /admin     ──▶ status code ──▶ LivenessState ─────▶ db slot
//! rand            ──▶ Sparkline::random() ───────────────▶ sparkline slot
//! ```

pub mod duration;
pub mod liveness;
pub mod sparkline;
pub mod stub_status;

pub use liveness::LivenessState;
pub use sparkline::Sparkline;
pub use stub_status::StubStatus;
