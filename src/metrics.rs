// Performance metrics module
//
// Lightweight counters for the refresh pipeline. The refresh path runs on
// every keystroke and every animation tick, so everything here is a lock-free
// atomic.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters collected over the highlighter's lifetime.
///
/// Logged as a summary on dispose and available to hosts for status displays.
#[derive(Debug)]
pub struct Metrics {
    /// Refreshes that reached the apply stage
    pub refreshes_completed: AtomicU64,

    /// Refreshes skipped because the document was over the size limit
    pub refreshes_skipped_oversize: AtomicU64,

    /// Refreshes skipped because the surface was already disposed
    pub refreshes_skipped_disposed: AtomicU64,

    /// Total decorated ranges applied across all refreshes
    pub ranges_applied: AtomicU64,

    /// Transient blink pulses applied
    pub blink_pulses: AtomicU64,

    /// Debounce timers rearmed by a newer text change
    pub debounce_rearms: AtomicU64,

    /// Animation ticks processed
    pub phase_ticks: AtomicU64,

    /// Configuration updates accepted
    pub config_updates: AtomicU64,

    /// Instance start time
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            refreshes_completed: AtomicU64::new(0),
            refreshes_skipped_oversize: AtomicU64::new(0),
            refreshes_skipped_disposed: AtomicU64::new(0),
            ranges_applied: AtomicU64::new(0),
            blink_pulses: AtomicU64::new(0),
            debounce_rearms: AtomicU64::new(0),
            phase_ticks: AtomicU64::new(0),
            config_updates: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a completed refresh and how many ranges it decorated
    pub fn record_refresh_completed(&self, ranges: usize) {
        self.refreshes_completed.fetch_add(1, Ordering::Relaxed);
        self.ranges_applied.fetch_add(ranges as u64, Ordering::Relaxed);
    }

    pub fn record_refresh_skipped_oversize(&self) {
        self.refreshes_skipped_oversize.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_refresh_skipped_disposed(&self) {
        self.refreshes_skipped_disposed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_blink_pulse(&self) {
        self.blink_pulses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_debounce_rearm(&self) {
        self.debounce_rearms.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_phase_tick(&self) {
        self.phase_ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_config_update(&self) {
        self.config_updates.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average decorated ranges per completed refresh
    pub fn avg_ranges_per_refresh(&self) -> f64 {
        let refreshes = self.refreshes_completed.load(Ordering::Relaxed);
        if refreshes > 0 {
            self.ranges_applied.load(Ordering::Relaxed) as f64 / refreshes as f64
        } else {
            0.0
        }
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Highlighter Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Refreshes: {} completed, {} skipped oversize, {} skipped disposed",
            self.refreshes_completed.load(Ordering::Relaxed),
            self.refreshes_skipped_oversize.load(Ordering::Relaxed),
            self.refreshes_skipped_disposed.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Ranges applied: {} (avg {:.1} per refresh)",
            self.ranges_applied.load(Ordering::Relaxed),
            self.avg_ranges_per_refresh()
        );
        tracing::info!(
            "Animation ticks: {}, blink pulses: {}, debounce rearms: {}, config updates: {}",
            self.phase_ticks.load(Ordering::Relaxed),
            self.blink_pulses.load(Ordering::Relaxed),
            self.debounce_rearms.load(Ordering::Relaxed),
            self.config_updates.load(Ordering::Relaxed)
        );
    }

    /// Log periodic metrics (for long-running sessions)
    pub fn log_periodic(&self) {
        tracing::info!(
            "Metrics: {} refreshes, {} ranges, {} ticks, uptime {:.0}s",
            self.refreshes_completed.load(Ordering::Relaxed),
            self.ranges_applied.load(Ordering::Relaxed),
            self.phase_ticks.load(Ordering::Relaxed),
            self.uptime().as_secs_f64()
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
