use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::clock::Clock;

// Fixed buckets in microseconds:
// 100us, 500us, 1ms, 5ms, 10ms, 50ms, 100ms, 500ms, 1s
pub(crate) const BUCKETS_MICROS: [u64; 9] =
    [100, 500, 1_000, 5_000, 10_000, 50_000, 100_000, 500_000, 1_000_000];

/// Duration distribution of timed events.
pub struct Timer {
    clock: Arc<dyn Clock>,
    count: AtomicU64,
    sum_nanos: AtomicU64,
    min_nanos: AtomicU64,
    max_nanos: AtomicU64,
    buckets: [AtomicU64; BUCKETS_MICROS.len()],
}

/// Point-in-time view of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub count: u64,
    pub sum: Duration,
    pub min: Duration,
    pub max: Duration,
}

impl TimerSnapshot {
    pub fn mean(&self) -> Duration {
        if self.count == 0 {
            return Duration::ZERO;
        }
        let mean = self.sum.as_nanos() / u128::from(self.count);
        Duration::from_nanos(u64::try_from(mean).unwrap_or(u64::MAX))
    }
}

/// An in-flight measurement. Owned by whoever started it; stopping consumes it.
#[derive(Clone)]
pub struct TimerContext {
    timer: Arc<Timer>,
    start: u64,
}

impl TimerContext {
    /// Record the elapsed time into the timer and return it.
    pub fn stop(self) -> Duration {
        let elapsed = self.timer.clock.tick().saturating_sub(self.start);
        self.timer.update_nanos(elapsed);
        Duration::from_nanos(elapsed)
    }
}

impl Timer {
    pub(crate) fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            count: AtomicU64::new(0),
            sum_nanos: AtomicU64::new(0),
            min_nanos: AtomicU64::new(u64::MAX),
            max_nanos: AtomicU64::new(0),
            buckets: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    /// Start a measurement.
    pub fn time(self: &Arc<Self>) -> TimerContext {
        TimerContext {
            timer: Arc::clone(self),
            start: self.clock.tick(),
        }
    }

    /// Record an externally measured duration.
    pub fn update(&self, duration: Duration) {
        self.update_nanos(u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX));
    }

    fn update_nanos(&self, nanos: u64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        // Saturates instead of wrapping.
        let _ = self
            .sum_nanos
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |sum| Some(sum.saturating_add(nanos)));
        self.min_nanos.fetch_min(nanos, Ordering::Relaxed);
        self.max_nanos.fetch_max(nanos, Ordering::Relaxed);

        // Cumulative: every bucket at or above the value.
        let micros = nanos / 1_000;
        for (i, &b) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= b {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let count = self.count();
        let min = if count == 0 { 0 } else { self.min_nanos.load(Ordering::Relaxed) };
        TimerSnapshot {
            count,
            sum: Duration::from_nanos(self.sum_nanos.load(Ordering::Relaxed)),
            min: Duration::from_nanos(min),
            max: Duration::from_nanos(self.max_nanos.load(Ordering::Relaxed)),
        }
    }

    /// Cumulative bucket counts paired with their upper bound in microseconds.
    pub(crate) fn buckets(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        BUCKETS_MICROS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&le, c)| (le, c.load(Ordering::Relaxed)))
    }
}
