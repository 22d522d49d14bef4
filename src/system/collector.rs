use std::collections::HashSet;

use tracing::{debug, trace, warn};

use super::baseline::SampleStore;
use super::host::HostLoad;
use super::meminfo::MemInfo;
use super::rank::{RankedEntry, select_top};
use super::scanner::scan;
use super::snapshot::TickReport;
use super::source::{ProcFs, ProcSource};
use super::stat::CpuTotals;
use super::usage::{UsageCalculator, system_delta};

pub const DEFAULT_TOP_N: usize = 5;

/// Owns everything that must survive between ticks: the per-pid baselines
/// and the previous system counter reading.
pub struct Collector<S: ProcSource = ProcFs> {
    source: S,
    baselines: SampleStore,
    previous_total: Option<u64>,
    top_n: usize,
}

impl<S: ProcSource> Collector<S> {
    /// Takes the first system counter reading so the first tick has
    /// something to measure against.
    pub fn new(source: S, top_n: usize) -> Self {
        let mut collector = Collector {
            source,
            baselines: SampleStore::new(),
            previous_total: None,
            top_n,
        };
        collector.previous_total = collector.read_system_total();
        collector
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn baselines(&self) -> &SampleStore {
        &self.baselines
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    fn read_system_total(&self) -> Option<u64> {
        let totals = self
            .source
            .read_system_stat()
            .map_err(|err| err.to_string())
            .and_then(|contents| CpuTotals::parse(&contents).map_err(|err| err.to_string()));
        match totals {
            Ok(totals) => Some(totals.total()),
            Err(err) => {
                warn!(%err, "cannot read system cpu counters");
                None
            }
        }
    }

    /// Runs one active tick: measure, rank, and move every baseline forward.
    pub fn sample(&mut self) -> TickReport {
        let delta = match (self.previous_total, self.read_system_total()) {
            (Some(previous), Some(current)) => {
                self.previous_total = Some(current);
                system_delta(previous, current)
            }
            (None, Some(current)) => {
                self.previous_total = Some(current);
                0
            }
            (_, None) => 0,
        };

        let samples = match scan(&self.source) {
            Ok(samples) => samples,
            Err(err) => {
                // Keep baselines untouched; an empty listing is not evidence
                // that every process exited.
                warn!(%err, "cannot list processes");
                return TickReport {
                    ranked: Vec::new(),
                    considered: 0,
                    system_delta: delta,
                };
            }
        };

        let considered = samples.len();
        let mut alive = HashSet::with_capacity(considered);
        let mut entries = Vec::with_capacity(considered);
        let mut calculator = UsageCalculator::new(&mut self.baselines);

        for sample in samples {
            let cpu_percent = calculator.percent(sample.pid, sample.cpu_time_total, delta);
            alive.insert(sample.pid);
            entries.push(RankedEntry {
                pid: sample.pid,
                name: sample.name,
                cpu_percent,
            });
        }

        let reclaimed = self.baselines.retain_alive(&alive);
        let ranked = select_top(entries, self.top_n);

        debug!(
            considered,
            system_delta = delta,
            reclaimed,
            tracked = self.baselines.len(),
            "tick sampled"
        );

        TickReport {
            ranked,
            considered,
            system_delta: delta,
        }
    }

    /// A paused tick still advances the system counter reading, but leaves
    /// every per-pid baseline where the last active tick put it.
    pub fn observe_paused(&mut self) {
        if let Some(total) = self.read_system_total() {
            self.previous_total = Some(total);
            trace!(total, "paused; system counter advanced");
        }
    }

    /// Uptime and load average from the same procfs tree as the processes.
    pub fn host_load(&self) -> Option<HostLoad> {
        let uptime = self.source.read_uptime().ok()?;
        let loadavg = self.source.read_loadavg().ok()?;
        match HostLoad::parse(&uptime, &loadavg) {
            Ok(load) => Some(load),
            Err(err) => {
                warn!(%err, "cannot parse uptime or loadavg");
                None
            }
        }
    }

    pub fn memory(&self) -> Option<MemInfo> {
        let contents = self.source.read_meminfo().ok()?;
        match MemInfo::parse(&contents) {
            Ok(info) => Some(info),
            Err(err) => {
                warn!(%err, "cannot parse meminfo");
                None
            }
        }
    }
}
