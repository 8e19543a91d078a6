//! Progress reporting for long batch passes
//!
//! The original tooling wrote a console status line every hundred rows via
//! process-wide counters. Here progress is an observer the caller passes
//! in; no core state depends on it.

/// Receives `(done, total)` row counts at a caller-visible cadence
pub trait ProgressObserver {
    fn on_progress(&mut self, done: usize, total: usize);
}

/// Observer that ignores all progress reports
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressObserver for NullProgress {
    fn on_progress(&mut self, _done: usize, _total: usize) {}
}

/// Rows between progress reports
pub const PROGRESS_CADENCE: usize = 100;
