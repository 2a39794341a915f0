use std::time::Duration;

use super::counters::CpuCounters;

/// Share of processor time spent busy between two samples, in `[0, 100]`.
///
/// Returns 0 when no time elapsed between the samples. Counters that moved
/// backwards (a reboot between samples) contribute a zero delta.
pub fn cpu_usage_percent(prev: &CpuCounters, cur: &CpuCounters) -> f64 {
    let total_delta = cur.total_time().saturating_sub(prev.total_time());
    if total_delta == 0 {
        return 0.0;
    }
    let idle_delta = cur.idle_time().saturating_sub(prev.idle_time());
    let busy_delta = total_delta.saturating_sub(idle_delta);
    (busy_delta as f64 * 100.0 / total_delta as f64).clamp(0.0, 100.0)
}

/// Per-second rate of a monotonic counter over `interval`.
///
/// A counter that went backwards (interface reset) yields 0.
pub fn rate(prev: u64, cur: u64, interval: Duration) -> u64 {
    let delta = cur.saturating_sub(prev);
    let secs = interval.as_secs_f64();
    if secs <= 0.0 {
        return 0;
    }
    (delta as f64 / secs).round() as u64
}

pub fn usage_percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    used as f64 * 100.0 / total as f64
}
