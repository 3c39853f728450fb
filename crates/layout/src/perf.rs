use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Trait for measuring layout performance.
///
/// In builds without the "profiling" feature the engine installs
/// [`NoOpProfiler`] and the timing helpers compile down to a plain call.
pub trait Profiler: Send + Sync {
    fn record(&self, key: &str, duration: Duration);
    /// Counts one iteration of a bounded loop (relayout passes, grid growth).
    fn count(&self, key: &str);
    fn reset(&self);

    /// Average time per recorded measurement.
    fn get_avg_item_time(&self) -> Option<Duration>;
}

/// A no-op profiler for production use.
pub struct NoOpProfiler;

impl Profiler for NoOpProfiler {
    #[inline(always)]
    fn record(&self, _key: &str, _duration: Duration) {}
    #[inline(always)]
    fn count(&self, _key: &str) {}
    #[inline(always)]
    fn reset(&self) {}
    #[inline(always)]
    fn get_avg_item_time(&self) -> Option<Duration> {
        None
    }
}

/// Collects per-key timings and iteration counts.
pub struct DebugProfiler {
    stats: Mutex<HashMap<String, Duration>>,
    counters: Mutex<HashMap<String, usize>>,
    items_processed: AtomicUsize,
    total_processing_time_ns: AtomicU64,
}

impl DebugProfiler {
    pub fn new() -> Self {
        Self {
            stats: Mutex::new(HashMap::new()),
            counters: Mutex::new(HashMap::new()),
            items_processed: AtomicUsize::new(0),
            total_processing_time_ns: AtomicU64::new(0),
        }
    }

    pub fn total(&self, key: &str) -> Option<Duration> {
        self.stats.lock().ok().and_then(|s| s.get(key).copied())
    }

    pub fn counter(&self, key: &str) -> usize {
        self.counters
            .lock()
            .ok()
            .and_then(|c| c.get(key).copied())
            .unwrap_or(0)
    }

    pub fn log_summary(&self) {
        let items = self.items_processed.load(Ordering::Acquire);
        if items == 0 {
            return;
        }
        log::info!("=== Layout Profile Summary ({} measurements) ===", items);
        if let Ok(stats) = self.stats.lock() {
            for (k, v) in stats.iter() {
                log::info!("{}: {:?}", k, v);
            }
        }
        if let Ok(counters) = self.counters.lock() {
            for (k, v) in counters.iter() {
                log::info!("{}: {} iterations", k, v);
            }
        }
    }
}

impl Default for DebugProfiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Profiler for DebugProfiler {
    fn record(&self, key: &str, duration: Duration) {
        if let Ok(mut g) = self.stats.lock() {
            *g.entry(key.to_string()).or_default() += duration;
        }
        self.items_processed.fetch_add(1, Ordering::Release);
        // Saturating conversion to prevent overflow on very long durations
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.total_processing_time_ns.fetch_add(nanos, Ordering::Release);
    }

    fn count(&self, key: &str) {
        if let Ok(mut g) = self.counters.lock() {
            *g.entry(key.to_string()).or_default() += 1;
        }
    }

    fn reset(&self) {
        if let Ok(mut g) = self.stats.lock() {
            g.clear();
        }
        if let Ok(mut g) = self.counters.lock() {
            g.clear();
        }
        self.items_processed.store(0, Ordering::Release);
        self.total_processing_time_ns.store(0, Ordering::Release);
    }

    fn get_avg_item_time(&self) -> Option<Duration> {
        let items = self.items_processed.load(Ordering::Acquire);
        let time_ns = self.total_processing_time_ns.load(Ordering::Acquire);
        if items == 0 {
            return None;
        }
        Some(Duration::from_nanos(time_ns / items as u64))
    }
}

/// Runs `f` and records its wall time under `key`.
#[cfg(feature = "profiling")]
pub(crate) fn measure<T>(profiler: &dyn Profiler, key: &str, f: impl FnOnce() -> T) -> T {
    let start = instant::Instant::now();
    let out = f();
    profiler.record(key, start.elapsed());
    out
}

#[cfg(not(feature = "profiling"))]
#[inline(always)]
pub(crate) fn measure<T>(_profiler: &dyn Profiler, _key: &str, f: impl FnOnce() -> T) -> T {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_profiler_accumulates_per_key() {
        let p = DebugProfiler::new();
        p.record("table_widths", Duration::from_millis(2));
        p.record("table_widths", Duration::from_millis(4));
        p.count("multicol_pass");
        p.count("multicol_pass");
        assert_eq!(p.total("table_widths"), Some(Duration::from_millis(6)));
        assert_eq!(p.counter("multicol_pass"), 2);
        assert_eq!(p.get_avg_item_time(), Some(Duration::from_millis(3)));
        p.reset();
        assert_eq!(p.counter("multicol_pass"), 0);
        assert!(p.get_avg_item_time().is_none());
    }
}
