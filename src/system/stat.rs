use thiserror::Error;

/// Cumulative time the whole machine spent in each CPU state, in clock ticks.
///
/// Sums over every core, so only the difference between two readings means
/// anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTotals {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatError {
    #[error("no aggregate `cpu` line found")]
    MissingCpuLine,
    #[error("expected 8 cpu time columns, found {0}")]
    TooFewColumns(usize),
    #[error("invalid cpu time value `{0}`")]
    InvalidValue(String),
}

const CPU_COLUMNS: usize = 8;

impl CpuTotals {
    /// The value used as the denominator for per-process percentages.
    pub fn total(&self) -> u64 {
        self.user
            .saturating_add(self.nice)
            .saturating_add(self.system)
            .saturating_add(self.idle)
            .saturating_add(self.iowait)
            .saturating_add(self.irq)
            .saturating_add(self.softirq)
            .saturating_add(self.steal)
    }

    /// Parses the aggregate `cpu` line out of the full `stat` file contents.
    ///
    /// Columns past `steal` (guest, guest_nice) are already counted in
    /// `user`/`nice` and are ignored.
    pub fn parse(contents: &str) -> Result<Self, StatError> {
        let line = contents
            .lines()
            .find(|line| line.split_whitespace().next() == Some("cpu"))
            .ok_or(StatError::MissingCpuLine)?;

        let values = line
            .split_whitespace()
            .skip(1)
            .take(CPU_COLUMNS)
            .map(|token| {
                token
                    .parse::<u64>()
                    .map_err(|_| StatError::InvalidValue(token.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let [user, nice, system, idle, iowait, irq, softirq, steal] = values[..] else {
            return Err(StatError::TooFewColumns(values.len()));
        };

        Ok(CpuTotals {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
            steal,
        })
    }
}
