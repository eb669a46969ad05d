//! Detected event models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of basketball action recognized by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Shoot,
    Pass,
}

impl EventKind {
    /// Wire representation (`"shoot"` / `"pass"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Shoot => "shoot",
            EventKind::Pass => "pass",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognized event kind strings.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized event kind: {0}")]
pub struct ParseEventKindError(pub String);

impl FromStr for EventKind {
    type Err = ParseEventKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shoot" => Ok(EventKind::Shoot),
            "pass" => Ok(EventKind::Pass),
            other => Err(ParseEventKindError(other.to_string())),
        }
    }
}

/// A single accepted detection.
///
/// Serializes to the `{"time": <f64>, "event": "shoot"|"pass"}` shape used
/// both by the API and by the persisted `events.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedEvent {
    /// Offset from video start, in seconds
    pub time: f64,
    /// Recognized action
    pub event: EventKind,
}

impl DetectedEvent {
    pub fn new(time: f64, event: EventKind) -> Self {
        Self { time, event }
    }
}

/// Ordered sequence of accepted detections for one analysis run.
///
/// Insertion-ordered by processing order (frame index ascending). Replaced
/// wholesale by the next run; never appended to across runs.
pub type EventLog = Vec<DetectedEvent>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_wire_format() {
        assert_eq!(serde_json::to_string(&EventKind::Shoot).unwrap(), "\"shoot\"");
        assert_eq!(serde_json::to_string(&EventKind::Pass).unwrap(), "\"pass\"");

        let kind: EventKind = serde_json::from_str("\"pass\"").unwrap();
        assert_eq!(kind, EventKind::Pass);
    }

    #[test]
    fn test_event_kind_from_str() {
        assert_eq!("shoot".parse::<EventKind>().unwrap(), EventKind::Shoot);
        assert_eq!("pass".parse::<EventKind>().unwrap(), EventKind::Pass);
        assert!("dunk".parse::<EventKind>().is_err());
        assert!("Shoot".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_detected_event_round_trip() {
        let event = DetectedEvent::new(12.5, EventKind::Shoot);
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"time":12.5,"event":"shoot"}"#);

        let back: DetectedEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result: Result<DetectedEvent, _> =
            serde_json::from_str(r#"{"time":1.0,"event":"rebound"}"#);
        assert!(result.is_err());
    }
}
