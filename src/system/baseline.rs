use std::collections::{HashMap, HashSet};

/// Last observed cumulative CPU time per pid, carried from one tick to the
/// next.
///
/// A pid that has never been recorded reads as 0. The first tick a process
/// is seen therefore charges its whole lifetime CPU time to that one
/// interval, which can briefly overstate long-running processes.
#[derive(Debug, Default)]
pub struct SampleStore {
    entries: HashMap<u32, u64>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pid: u32) -> u64 {
        self.entries.get(&pid).copied().unwrap_or(0)
    }

    pub fn set(&mut self, pid: u32, cpu_time_total: u64) {
        self.entries.insert(pid, cpu_time_total);
    }

    /// Drop baselines for pids missing from the latest scan.
    pub fn retain_alive(&mut self, alive_pids: &HashSet<u32>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|pid, _| alive_pids.contains(pid));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
