//! Chat-responder formatting.

use hoopsight_models::EventLog;

/// Reply when no events exist and no analysis is running.
pub const NO_EVENTS_REPLY: &str = "No events detected yet. Please analyze a video first.";

/// Reply while an analysis run is in flight.
pub const ANALYSIS_RUNNING_REPLY: &str =
    "Analysis is still running. Please try again once it completes.";

/// Placeholder summary for an empty log.
const EMPTY_SUMMARY: &str = "No significant events detected.";

/// Format an event log as the newline-delimited summary handed to the model.
pub fn format_events_summary(events: &EventLog) -> String {
    if events.is_empty() {
        return EMPTY_SUMMARY.to_string();
    }

    events
        .iter()
        .map(|e| format!("At {}s: {}", e.time, e.event))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoopsight_models::{DetectedEvent, EventKind};

    #[test]
    fn test_summary_lines() {
        let events = vec![
            DetectedEvent::new(1.5, EventKind::Shoot),
            DetectedEvent::new(4.0, EventKind::Pass),
        ];
        assert_eq!(
            format_events_summary(&events),
            "At 1.5s: shoot\nAt 4s: pass"
        );
    }

    #[test]
    fn test_empty_summary_placeholder() {
        assert_eq!(format_events_summary(&Vec::new()), EMPTY_SUMMARY);
    }
}
