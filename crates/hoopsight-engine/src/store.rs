//! Event store.
//!
//! Holds the most recent completed event log as an atomically-swapped
//! immutable snapshot, so readers never observe a partially-built list.
//! Optionally mirrors each completed run to a JSON document on disk.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use hoopsight_models::{DetectedEvent, EventLog};

use crate::error::EngineResult;

/// In-memory store for the latest completed event log.
pub struct EventStore {
    current: RwLock<Arc<EventLog>>,
    mirror_path: Option<PathBuf>,
}

impl EventStore {
    /// Create a store, optionally mirroring completed runs to `mirror_path`.
    pub fn new(mirror_path: Option<PathBuf>) -> Self {
        Self {
            current: RwLock::new(Arc::new(EventLog::new())),
            mirror_path,
        }
    }

    /// Latest completed log (empty before the first run). Non-blocking for
    /// readers; the returned snapshot is immutable.
    pub fn snapshot(&self) -> Arc<EventLog> {
        Arc::clone(&self.current.read().expect("event store lock poisoned"))
    }

    /// Replace the store's contents wholesale with a completed run.
    ///
    /// The in-memory snapshot swap is atomic from the readers' point of
    /// view. Mirror write failures are logged, not fatal.
    pub async fn replace(&self, events: EventLog) {
        let snapshot = Arc::new(events);
        {
            let mut current = self.current.write().expect("event store lock poisoned");
            *current = Arc::clone(&snapshot);
        }

        if let Some(ref path) = self.mirror_path {
            match save_events(path, &snapshot).await {
                Ok(()) => info!(path = %path.display(), events = snapshot.len(), "Event log mirrored"),
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to mirror event log"),
            }
        }
    }
}

/// Write an event log as a pretty-printed JSON array of `{time, event}`.
pub async fn save_events(path: impl AsRef<Path>, events: &EventLog) -> EngineResult<()> {
    let json = serde_json::to_vec_pretty(events)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// Read a previously mirrored event log back from disk.
pub async fn load_events(path: impl AsRef<Path>) -> EngineResult<EventLog> {
    let bytes = tokio::fs::read(path).await?;
    let events: Vec<DetectedEvent> = serde_json::from_slice(&bytes)?;
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoopsight_models::EventKind;

    fn sample_log() -> EventLog {
        vec![
            DetectedEvent::new(0.5, EventKind::Shoot),
            DetectedEvent::new(2.5, EventKind::Pass),
            DetectedEvent::new(4.0, EventKind::Shoot),
        ]
    }

    #[tokio::test]
    async fn test_empty_before_first_run() {
        let store = EventStore::new(None);
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_replace_swaps_wholesale() {
        let store = EventStore::new(None);
        store.replace(sample_log()).await;
        assert_eq!(*store.snapshot(), sample_log());

        // The next run fully replaces the previous one.
        let second = vec![DetectedEvent::new(9.0, EventKind::Pass)];
        store.replace(second.clone()).await;
        assert_eq!(*store.snapshot(), second);
    }

    #[tokio::test]
    async fn test_earlier_snapshots_survive_replacement() {
        let store = EventStore::new(None);
        store.replace(sample_log()).await;
        let held = store.snapshot();
        store.replace(EventLog::new()).await;
        assert_eq!(*held, sample_log());
    }

    #[tokio::test]
    async fn test_mirror_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");

        let store = EventStore::new(Some(path.clone()));
        store.replace(sample_log()).await;

        let loaded = load_events(&path).await.unwrap();
        assert_eq!(loaded, sample_log());
    }

    #[tokio::test]
    async fn test_mirror_failure_keeps_memory_state() {
        // Unwritable mirror path: memory snapshot still updates.
        let store = EventStore::new(Some(PathBuf::from("/nonexistent/dir/events.json")));
        store.replace(sample_log()).await;
        assert_eq!(*store.snapshot(), sample_log());
    }
}
