use std::cmp::Ordering;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
}

/// Highest CPU first; equal percentages fall back to ascending pid so the
/// order is the same every tick.
pub fn by_usage_then_pid(a: &RankedEntry, b: &RankedEntry) -> Ordering {
    b.cpu_percent
        .partial_cmp(&a.cpu_percent)
        .unwrap_or(Ordering::Equal)
        .then(a.pid.cmp(&b.pid))
}

/// Returns at most `n` entries ordered by [`by_usage_then_pid`].
pub fn select_top(mut entries: Vec<RankedEntry>, n: usize) -> Vec<RankedEntry> {
    if n == 0 {
        return Vec::new();
    }
    if entries.len() > n {
        entries.select_nth_unstable_by(n - 1, by_usage_then_pid);
        entries.truncate(n);
    }
    entries.sort_by(by_usage_then_pid);
    entries
}
