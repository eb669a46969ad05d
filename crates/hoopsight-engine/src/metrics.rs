//! Pipeline metrics.

use metrics::counter;

/// Metric names as constants for consistency.
pub mod names {
    pub const DETECTOR_CALLS_TOTAL: &str = "hoopsight_detector_calls_total";
    pub const DETECTOR_PARSE_FAILURES_TOTAL: &str = "hoopsight_detector_parse_failures_total";
    pub const EVENTS_ACCEPTED_TOTAL: &str = "hoopsight_events_accepted_total";
    pub const EVENTS_SUPPRESSED_TOTAL: &str = "hoopsight_events_suppressed_total";
    pub const RUNS_COMPLETED_TOTAL: &str = "hoopsight_runs_completed_total";
    pub const RUNS_FAILED_TOTAL: &str = "hoopsight_runs_failed_total";
}

/// Record one detector invocation.
pub fn record_detector_call() {
    counter!(names::DETECTOR_CALLS_TOTAL).increment(1);
}

/// Record a detector response that could not be parsed (recovered as zero events).
pub fn record_parse_failure() {
    counter!(names::DETECTOR_PARSE_FAILURES_TOTAL).increment(1);
}

/// Record an accepted detection.
pub fn record_event_accepted(kind: &str) {
    counter!(names::EVENTS_ACCEPTED_TOTAL, &[("kind", kind.to_string())]).increment(1);
}

/// Record a detection suppressed by the cooldown window.
pub fn record_event_suppressed(kind: &str) {
    counter!(names::EVENTS_SUPPRESSED_TOTAL, &[("kind", kind.to_string())]).increment(1);
}

/// Record an analysis run outcome.
pub fn record_run_completed(success: bool) {
    if success {
        counter!(names::RUNS_COMPLETED_TOTAL).increment(1);
    } else {
        counter!(names::RUNS_FAILED_TOTAL).increment(1);
    }
}
