//! Parsing of the nginx `stub_status` text page.
//!
//! The page served at `/status/raw` looks like this:
//!
//! ```text
//! Active connections: 291
//! server accepts handled requests
//!  16630948 16630948 31070465
//! Reading: 6 Writing: 179 Waiting: 106
//! ```
//!
//! Only the first line is required. The remaining counters are picked up
//! when present and left as `None` otherwise.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Connection counters parsed from a stub_status page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StubStatus {
    /// Currently open client connections, including waiting ones.
    pub active: u64,
    /// Total accepted client connections.
    pub accepts: Option<u64>,
    /// Total handled connections.
    pub handled: Option<u64>,
    /// Total client requests.
    pub requests: Option<u64>,
    /// Connections where nginx is reading the request header.
    pub reading: Option<u64>,
    /// Connections where nginx is writing the response.
    pub writing: Option<u64>,
    /// Idle keep-alive connections.
    pub waiting: Option<u64>,
}

fn active_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Active connections:\s*(\d+)").expect("valid regex"))
}

fn totals_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?im)accepts\s+handled\s+requests\s*\n\s*(\d+)\s+(\d+)\s+(\d+)")
            .expect("valid regex")
    })
}

fn states_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)Reading:\s*(\d+)\s+Writing:\s*(\d+)\s+Waiting:\s*(\d+)")
            .expect("valid regex")
    })
}

fn capture_u64(caps: &regex::Captures<'_>, index: usize) -> Option<u64> {
    caps.get(index)?.as_str().parse().ok()
}

impl StubStatus {
    /// Parse a stub_status body.
    ///
    /// Returns `None` when the body has no `Active connections` line.
    pub fn parse(text: &str) -> Option<Self> {
        let active = active_re().captures(text).and_then(|c| capture_u64(&c, 1))?;

        let totals = totals_re().captures(text);
        let states = states_re().captures(text);

        Some(Self {
            active,
            accepts: totals.as_ref().and_then(|c| capture_u64(c, 1)),
            handled: totals.as_ref().and_then(|c| capture_u64(c, 2)),
            requests: totals.as_ref().and_then(|c| capture_u64(c, 3)),
            reading: states.as_ref().and_then(|c| capture_u64(c, 1)),
            writing: states.as_ref().and_then(|c| capture_u64(c, 2)),
            waiting: states.as_ref().and_then(|c| capture_u64(c, 3)),
        })
    }

    /// Connections accepted but not handled (resource limits hit).
    pub fn dropped(&self) -> Option<u64> {
        Some(self.accepts?.saturating_sub(self.handled?))
    }
}
