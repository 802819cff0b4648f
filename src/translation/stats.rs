use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for a single run
///
/// Shared as `Arc<RunStatistics>` between the orchestrators and the client
/// adapter. Counters only ever grow; a new run starts from a new instance.
#[derive(Debug, Default)]
pub struct RunStatistics {
    total_cells: AtomicUsize,
    translated_count: AtomicUsize,
    skipped_count: AtomicUsize,
    error_count: AtomicUsize,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_cells: usize,
    pub translated_count: usize,
    pub skipped_count: usize,
    pub error_count: usize,
}

impl StatsSnapshot {
    /// Whether every examined cell ended up in exactly one outcome bucket
    pub fn is_balanced(&self) -> bool {
        self.total_cells == self.translated_count + self.skipped_count + self.error_count
    }
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_examined(&self) {
        self.total_cells.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_translated(&self) {
        self.translated_count.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_skipped(&self) {
        self.skipped_count.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_error(&self) {
        self.error_count.fetch_add(1, Ordering::SeqCst);
    }

    pub fn total_cells(&self) -> usize {
        self.total_cells.load(Ordering::SeqCst)
    }

    pub fn translated_count(&self) -> usize {
        self.translated_count.load(Ordering::SeqCst)
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped_count.load(Ordering::SeqCst)
    }

    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_cells: self.total_cells(),
            translated_count: self.translated_count(),
            skipped_count: self.skipped_count(),
            error_count: self.error_count(),
        }
    }
}
