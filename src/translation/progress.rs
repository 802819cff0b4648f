/*!
 * Progress reporting and cooperative cancellation.
 *
 * Progress is pushed to a `ProgressSink` through a `ProgressThrottle` so that a
 * large sheet does not flood the consumer. Cancellation is a shared flag that the
 * orchestrators poll at fixed points; it never interrupts a call in flight.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Processed/total counts plus an optional human-readable detail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub processed: usize,
    pub total: usize,
    pub detail: Option<String>,
}

impl ProgressSnapshot {
    pub fn new(processed: usize, total: usize, detail: Option<String>) -> Self {
        Self {
            processed,
            total,
            detail,
        }
    }

    /// Completion ratio in `[0, 1]`, zero for an empty run
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.processed as f64 / self.total as f64).min(1.0)
        }
    }
}

/// Consumer of progress notifications
pub trait ProgressSink: Send + Sync {
    fn notify(&self, snapshot: ProgressSnapshot);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressSnapshot) + Send + Sync,
{
    fn notify(&self, snapshot: ProgressSnapshot) {
        self(snapshot)
    }
}

/// Sink that drops every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn notify(&self, _snapshot: ProgressSnapshot) {}
}

/// Decides when a progress notification is due
///
/// A notification is due when the processed count is a multiple of `every_cells`
/// or when `interval` has elapsed since the last one.
#[derive(Debug)]
pub struct ProgressThrottle {
    every_cells: usize,
    interval: Duration,
    last_emit: Instant,
}

impl ProgressThrottle {
    pub fn new(every_cells: usize, interval: Duration) -> Self {
        Self {
            every_cells: every_cells.max(1),
            interval,
            last_emit: Instant::now(),
        }
    }

    /// Whether to emit for this processed count; resets the timer when it does
    pub fn should_emit(&mut self, processed: usize) -> bool {
        let now = Instant::now();
        let due = processed % self.every_cells == 0 || now.duration_since(self.last_emit) >= self.interval;
        if due {
            self.last_emit = now;
        }
        due
    }

    /// Emit through `sink` if due
    pub fn maybe_emit(&mut self, sink: &dyn ProgressSink, snapshot: ProgressSnapshot) {
        if self.should_emit(snapshot.processed) {
            sink.notify(snapshot);
        }
    }

    /// Emit unconditionally, e.g. at the end of a sheet
    pub fn force_emit(&mut self, sink: &dyn ProgressSink, snapshot: ProgressSnapshot) {
        self.last_emit = Instant::now();
        sink.notify(snapshot);
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::new(10, Duration::from_millis(500))
    }
}

/// Running count of processed cells against the document-wide total
pub struct ProgressTracker<'a> {
    sink: &'a dyn ProgressSink,
    throttle: ProgressThrottle,
    processed: usize,
    total: usize,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(sink: &'a dyn ProgressSink, throttle: ProgressThrottle, total: usize) -> Self {
        Self {
            sink,
            throttle,
            processed: 0,
            total,
        }
    }

    /// Count one processed cell and notify if due
    pub fn advance(&mut self, detail: impl FnOnce() -> String) {
        self.processed += 1;
        if self.throttle.should_emit(self.processed) {
            self.sink
                .notify(ProgressSnapshot::new(self.processed, self.total, Some(detail())));
        }
    }

    /// Notify unconditionally with the current counts
    pub fn flush(&mut self, detail: impl Into<String>) {
        let snapshot = ProgressSnapshot::new(self.processed, self.total, Some(detail.into()));
        self.throttle.force_emit(self.sink, snapshot);
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

/// Cooperative stop signal, set once and never reset
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
