use std::fmt::Write;
use std::sync::Arc;

use dashmap::DashMap;

use super::clock::{Clock, SystemClock};
use super::meter::Meter;
use super::timer::Timer;
use crate::error::{Result, RouteMeterError};

#[derive(Clone)]
enum Metric {
    Timer(Arc<Timer>),
    Meter(Arc<Meter>),
}

impl Metric {
    fn kind(&self) -> &'static str {
        match self {
            Metric::Timer(_) => "timer",
            Metric::Meter(_) => "meter",
        }
    }
}

/// Process-wide store of named metrics. Get-or-create by dotted name; one
/// name maps to exactly one metric of one kind.
pub struct MetricRegistry {
    clock: Arc<dyn Clock>,
    metrics: DashMap<String, Metric>,
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::default()))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            metrics: DashMap::new(),
        }
    }

    /// Timer registered under `name`, created on first use.
    pub fn timer(&self, name: &str) -> Result<Arc<Timer>> {
        match self.get_or_create(name, || Metric::Timer(Arc::new(Timer::new(Arc::clone(&self.clock))))) {
            Metric::Timer(t) => Ok(t),
            other => Err(mismatch(name, &other, "timer")),
        }
    }

    /// Meter registered under `name`, created on first use.
    pub fn meter(&self, name: &str) -> Result<Arc<Meter>> {
        match self.get_or_create(name, || Metric::Meter(Arc::new(Meter::new(Arc::clone(&self.clock))))) {
            Metric::Meter(m) => Ok(m),
            other => Err(mismatch(name, &other, "meter")),
        }
    }

    fn get_or_create(&self, name: &str, make: impl FnOnce() -> Metric) -> Metric {
        if let Some(existing) = self.metrics.get(name) {
            return existing.value().clone();
        }
        self.metrics
            .entry(name.to_string())
            .or_insert_with(|| {
                let metric = make();
                tracing::debug!(metric = %name, kind = metric.kind(), "metric registered");
                metric
            })
            .value()
            .clone()
    }

    pub fn get_timer(&self, name: &str) -> Option<Arc<Timer>> {
        match self.metrics.get(name)?.value() {
            Metric::Timer(t) => Some(Arc::clone(t)),
            Metric::Meter(_) => None,
        }
    }

    pub fn get_meter(&self, name: &str) -> Option<Arc<Meter>> {
        match self.metrics.get(name)?.value() {
            Metric::Meter(m) => Some(Arc::clone(m)),
            Metric::Timer(_) => None,
        }
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.metrics.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Render every metric in Prometheus text exposition format, sorted by name.
    /// Timers are histograms in microseconds; meters are counters.
    pub fn render(&self) -> String {
        let mut entries: Vec<(String, Metric)> = self
            .metrics
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut out = String::new();
        for (name, metric) in entries {
            let base = sanitize(&name);
            match metric {
                Metric::Timer(t) => render_timer(&format!("{base}_duration_micros"), &t, &mut out),
                Metric::Meter(m) => {
                    let name = format!("{base}_total");
                    let _ = writeln!(out, "# TYPE {name} counter");
                    let _ = writeln!(out, "{name} {}", m.count());
                }
            }
        }
        out
    }
}

fn mismatch(name: &str, existing: &Metric, requested: &'static str) -> RouteMeterError {
    RouteMeterError::MetricKindMismatch {
        name: name.to_string(),
        existing: existing.kind(),
        requested,
    }
}

fn render_timer(name: &str, timer: &Timer, out: &mut String) {
    let snap = timer.snapshot();
    let _ = writeln!(out, "# TYPE {name} histogram");
    for (le, count) in timer.buckets() {
        let _ = writeln!(out, "{name}_bucket{{le=\"{le}\"}} {count}");
    }
    let _ = writeln!(out, "{name}_bucket{{le=\"+Inf\"}} {}", snap.count);
    let _ = writeln!(out, "{name}_sum {}", snap.sum.as_micros());
    let _ = writeln!(out, "{name}_count {}", snap.count);
}

/// Map a dotted metric name onto the Prometheus name alphabet.
fn sanitize(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == ':' { c } else { '_' })
        .collect();
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}
