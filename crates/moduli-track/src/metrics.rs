//! Process-wide counts of applied options, recorded changes and hook calls.
//!
//! [`Metrics::flush`] reports the totals through `tracing`.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by `apply` and [`Memory::record`](crate::Memory::record).
pub static METRICS: Metrics = Metrics::new();

pub struct Metrics {
    options_applied: AtomicU64,
    changes_tracked: AtomicU64,
    hooks_invoked: AtomicU64,
}

impl Metrics {
    const fn new() -> Self {
        Self {
            options_applied: AtomicU64::new(0),
            changes_tracked: AtomicU64::new(0),
            hooks_invoked: AtomicU64::new(0),
        }
    }

    /// One top-level option passed to `apply`, however many steps it ran.
    pub fn inc_options_applied(&self) {
        self.options_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_changes_tracked(&self) {
        self.changes_tracked.fetch_add(1, Ordering::Relaxed);
    }

    /// `n` hooks ran for one change.
    pub fn add_hooks_invoked(&self, n: u64) {
        if n > 0 {
            self.hooks_invoked.fetch_add(n, Ordering::Relaxed);
        }
    }

    /// Logs the current totals at `info`.
    pub fn flush(&self) {
        tracing::info!(
            options_applied = self.options_applied(),
            changes_tracked = self.changes_tracked(),
            hooks_invoked = self.hooks_invoked(),
            "moduli counters"
        );
    }

    pub fn options_applied(&self) -> u64 {
        self.options_applied.load(Ordering::Relaxed)
    }

    pub fn changes_tracked(&self) -> u64 {
        self.changes_tracked.load(Ordering::Relaxed)
    }

    pub fn hooks_invoked(&self) -> u64 {
        self.hooks_invoked.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn counters_accumulate_independently() {
        let m = Metrics::new();
        assert_eq!(m.options_applied(), 0);
        m.inc_options_applied();
        m.inc_options_applied();
        assert_eq!(m.options_applied(), 2);

        m.inc_changes_tracked();
        assert_eq!(m.changes_tracked(), 1);

        m.add_hooks_invoked(3);
        m.add_hooks_invoked(0);
        assert_eq!(m.hooks_invoked(), 3);
    }

    #[traced_test]
    #[test]
    fn flush_emits_counter_values() {
        let m = Metrics::new();
        m.inc_changes_tracked();
        m.add_hooks_invoked(2);
        m.flush();
        assert!(logs_contain("moduli counters"));
        assert!(logs_contain("changes_tracked=1"));
        assert!(logs_contain("hooks_invoked=2"));
    }
}
