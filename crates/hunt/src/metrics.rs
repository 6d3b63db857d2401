// Metrics hooks for the `hunt` crate.
//
// Callers install a global `HuntMetrics` implementation via [`set_hunt_metrics`];
// every `Hunt` then reports its latency and counters when it finishes, and
// every isolated hunter failure as it happens. Runs abandoned before the end
// of the traversal are not reported.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;
use traverse::TraversalMode;

use crate::types::{HuntStage, HuntStats};

/// Metrics observer for hunt runs.
pub trait HuntMetrics: Send + Sync {
    /// Record a finished run: exhausted, capped by `max_matches`, or ended
    /// by a fatal traversal error.
    fn record_run(&self, mode: TraversalMode, latency: Duration, stats: &HuntStats);

    /// Record one (hunter, node) failure that the engine isolated.
    fn record_hunter_failure(&self, hunter: &str, stage: HuntStage);
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn HuntMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn HuntMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn HuntMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global hunt metrics recorder.
pub fn set_hunt_metrics(recorder: Option<Arc<dyn HuntMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
