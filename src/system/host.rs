use sysinfo::{CpuRefreshKind, RefreshKind, System};
use thiserror::Error;

/// Facts about the machine that do not change while running.
///
/// Always detected on the local host, whatever procfs root the process
/// table is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub cpu_model: String,
    pub logical_cores: usize,
}

impl HostInfo {
    pub fn detect() -> Self {
        let sys =
            System::new_with_specifics(RefreshKind::nothing().with_cpu(CpuRefreshKind::everything()));
        let cpu_model = sys
            .cpus()
            .iter()
            .map(|cpu| cpu.brand().trim())
            .find(|brand| !brand.is_empty())
            .unwrap_or("unknown")
            .to_string();
        HostInfo {
            cpu_model,
            logical_cores: sys.cpus().len(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostLoadError {
    #[error("missing {0} field")]
    MissingField(&'static str),
    #[error("invalid number {0:?}")]
    InvalidValue(String),
}

/// Uptime and load average, read fresh every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HostLoad {
    pub uptime_secs: u64,
    pub load_average: [f64; 3],
}

impl HostLoad {
    /// Parses the contents of `uptime` ("350735.47 234388.90") and
    /// `loadavg` ("0.20 0.18 0.12 1/80 11206").
    pub fn parse(uptime: &str, loadavg: &str) -> Result<Self, HostLoadError> {
        let seconds = uptime
            .split_whitespace()
            .next()
            .ok_or(HostLoadError::MissingField("uptime"))?;
        let seconds: f64 = seconds
            .parse()
            .map_err(|_| HostLoadError::InvalidValue(seconds.to_string()))?;

        let mut fields = loadavg.split_whitespace();
        let mut load_average = [0.0; 3];
        for (slot, name) in load_average.iter_mut().zip(["load1", "load5", "load15"]) {
            let raw = fields.next().ok_or(HostLoadError::MissingField(name))?;
            *slot = raw
                .parse()
                .map_err(|_| HostLoadError::InvalidValue(raw.to_string()))?;
        }

        Ok(HostLoad {
            uptime_secs: seconds.max(0.0) as u64,
            load_average,
        })
    }
}
