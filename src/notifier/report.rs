use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters shared by every notifier worker
#[derive(Debug)]
pub struct NotifierReport {
    succeeded: AtomicU64,
    failed: AtomicU64,
    started: Instant,
}

/// Snapshot of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifierSummary {
    pub succeeded: u64,
    pub failed: u64,
    pub duration: Duration,
}

impl NotifierReport {
    pub fn start() -> Self {
        Self {
            succeeded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    pub fn record_success(&self) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn summary(&self) -> NotifierSummary {
        NotifierSummary {
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            duration: self.started.elapsed(),
        }
    }
}
