//! Liveness state of a probed endpoint.

use std::fmt;

use serde::Serialize;

/// Result of a liveness probe, as shown in an indicator slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LivenessState {
    /// The endpoint answered with a 2xx status.
    Online,
    /// The endpoint answered with a non-2xx status, or the request failed.
    Offline,
    /// Not probed yet, or invalidated by a failed raw status fetch.
    #[default]
    Unknown,
}

impl LivenessState {
    /// Map an HTTP status code to a liveness state.
    pub fn from_status(status: u16) -> Self {
        if (200..300).contains(&status) {
            LivenessState::Online
        } else {
            LivenessState::Offline
        }
    }

    /// Returns the indicator text.
    pub fn as_str(&self) -> &'static str {
        match self {
            LivenessState::Online => "online",
            LivenessState::Offline => "offline",
            LivenessState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for LivenessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert_eq!(LivenessState::from_status(200), LivenessState::Online);
        assert_eq!(LivenessState::from_status(204), LivenessState::Online);
        assert_eq!(LivenessState::from_status(299), LivenessState::Online);
        assert_eq!(LivenessState::from_status(301), LivenessState::Offline);
        assert_eq!(LivenessState::from_status(404), LivenessState::Offline);
        assert_eq!(LivenessState::from_status(503), LivenessState::Offline);
    }

    #[test]
    fn test_display_strings() {
        assert_eq!(LivenessState::Online.to_string(), "online");
        assert_eq!(LivenessState::Offline.to_string(), "offline");
        assert_eq!(LivenessState::Unknown.to_string(), "unknown");
        assert_eq!(LivenessState::default(), LivenessState::Unknown);
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&LivenessState::Online).unwrap();
        assert_eq!(json, "\"online\"");
    }
}
