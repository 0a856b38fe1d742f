//! Shared health state for the /health endpoint.
//! Updated by the report handlers after every build attempt.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Shared health counters. Updated by handlers, read by /health.
#[derive(Default)]
pub struct HealthState {
    /// Reports and performance breakdowns returned successfully.
    pub reports_served: AtomicU64,
    /// Builds that failed on a source read (timeout or database error).
    pub source_failures: AtomicU64,
    /// Nanosecond timestamp of the last successful build (0 = none).
    pub last_report_at_ns: AtomicU64,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HealthSnapshot {
    pub reports_served: u64,
    pub source_failures: u64,
    pub last_report_at_ns: u64,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, at_ns: u64) {
        self.reports_served.fetch_add(1, Ordering::Relaxed);
        self.last_report_at_ns.store(at_ns, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.source_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot {
            reports_served: self.reports_served.load(Ordering::Relaxed),
            source_failures: self.source_failures.load(Ordering::Relaxed),
            last_report_at_ns: self.last_report_at_ns.load(Ordering::Relaxed),
        }
    }
}
