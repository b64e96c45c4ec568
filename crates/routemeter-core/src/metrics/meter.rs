use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::clock::Clock;

/// Counts occurrences and reports their mean rate since creation.
pub struct Meter {
    clock: Arc<dyn Clock>,
    start_tick: u64,
    count: AtomicU64,
}

impl Meter {
    pub(crate) fn new(clock: Arc<dyn Clock>) -> Self {
        let start_tick = clock.tick();
        Self {
            clock,
            start_tick,
            count: AtomicU64::new(0),
        }
    }

    /// Record one occurrence.
    pub fn mark(&self) {
        self.mark_n(1);
    }

    /// Record `n` occurrences.
    pub fn mark_n(&self, n: u64) {
        self.count.fetch_add(n, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Events per second since creation; 0 before any time has passed.
    pub fn mean_rate(&self) -> f64 {
        let elapsed = self.clock.tick().saturating_sub(self.start_tick);
        if elapsed == 0 {
            return 0.0;
        }
        self.count() as f64 / (elapsed as f64 / 1e9)
    }
}
