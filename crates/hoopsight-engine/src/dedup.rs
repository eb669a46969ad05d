//! Temporal deduplication of detections.

use std::collections::HashMap;

use hoopsight_models::{DetectedEvent, EventKind};

/// Per-kind cooldown filter.
///
/// Tracks the time of the last *accepted* event of each kind within one
/// analysis run. A detection is accepted when its kind has not been seen
/// yet, or when it falls at least the cooldown window after the last
/// accepted occurrence of the same kind. Rejected detections leave the
/// tracker untouched, so acceptance is always measured against accepted
/// events, never against rejected ones.
#[derive(Debug)]
pub struct CooldownFilter {
    window: f64,
    last_accepted: HashMap<EventKind, f64>,
}

impl CooldownFilter {
    /// Create a filter with the given cooldown window in seconds.
    pub fn new(window: f64) -> Self {
        Self {
            window,
            last_accepted: HashMap::new(),
        }
    }

    /// Decide whether `event` survives deduplication, updating the tracker
    /// when it does.
    pub fn accept(&mut self, event: &DetectedEvent) -> bool {
        match self.last_accepted.get(&event.event) {
            Some(&last) if event.time - last < self.window => false,
            _ => {
                self.last_accepted.insert(event.event, event.time);
                true
            }
        }
    }
}
