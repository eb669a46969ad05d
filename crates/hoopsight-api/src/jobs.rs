//! Single-flight analysis guard.
//!
//! At most one analysis pipeline runs process-wide. The guard is an
//! explicit compare-and-swap on an atomic flag; acquisition hands back a
//! permit that releases on drop, so the `Running -> Idle` transition
//! happens on every exit path, including panics inside the pipeline task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use scopeguard::ScopeGuard;

/// Process-wide "analysis in progress" state.
#[derive(Debug, Default)]
pub struct JobGuard {
    running: AtomicBool,
}

/// Held for the duration of one analysis run; releases the guard on drop.
pub type JobPermit = ScopeGuard<Arc<JobGuard>, fn(Arc<JobGuard>)>;

fn release(guard: Arc<JobGuard>) {
    guard.running.store(false, Ordering::Release);
}

impl JobGuard {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Try to transition `Idle -> Running`. Returns `None` when a run is
    /// already in flight; no state is mutated in that case.
    pub fn try_begin(self: &Arc<Self>) -> Option<JobPermit> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(scopeguard::guard(
            Arc::clone(self),
            release as fn(Arc<JobGuard>),
        ))
    }

    /// Whether an analysis run is currently in flight.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_flight() {
        let guard = JobGuard::new();
        let permit = guard.try_begin().expect("first acquisition succeeds");
        assert!(guard.is_running());
        assert!(guard.try_begin().is_none());
        drop(permit);
        assert!(!guard.is_running());
        assert!(guard.try_begin().is_some());
    }

    #[test]
    fn test_released_on_panic() {
        let guard = JobGuard::new();
        let inner = Arc::clone(&guard);
        let result = std::panic::catch_unwind(move || {
            let _permit = inner.try_begin().unwrap();
            panic!("pipeline blew up");
        });
        assert!(result.is_err());
        assert!(!guard.is_running());
        assert!(guard.try_begin().is_some());
    }
}
