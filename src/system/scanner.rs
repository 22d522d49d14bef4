use thiserror::Error;
use tracing::trace;

use super::source::ProcSource;

/// One process as seen by a single scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    /// utime + stime, in clock ticks since the process started.
    pub cpu_time_total: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PidStatError {
    #[error("record has no parenthesised command name")]
    MissingName,
    #[error("invalid pid field `{0}`")]
    InvalidPid(String),
    #[error("record has {0} fields after the command name, need at least 13")]
    TooFewFields(usize),
    #[error("invalid cpu time field `{0}`")]
    InvalidCpuTime(String),
}

// Positions counted from the first field after the closing `)`:
// state(0) ppid(1) pgrp(2) session(3) tty_nr(4) tpgid(5) flags(6)
// minflt(7) cminflt(8) majflt(9) cmajflt(10) utime(11) stime(12)
const UTIME_INDEX: usize = 11;
const STIME_INDEX: usize = 12;

/// Parses one `<pid>/stat` record.
///
/// The command name runs from the first `(` to the last `)`, so names with
/// spaces or parentheses of their own survive. Trailing fields beyond
/// `stime` are ignored.
pub fn parse_pid_stat(record: &str) -> Result<ProcessSample, PidStatError> {
    let open = record.find('(').ok_or(PidStatError::MissingName)?;
    let close = record.rfind(')').ok_or(PidStatError::MissingName)?;
    if close < open {
        return Err(PidStatError::MissingName);
    }

    let pid_field = record[..open].trim();
    let pid = pid_field
        .parse::<u32>()
        .ok()
        .filter(|pid| *pid > 0)
        .ok_or_else(|| PidStatError::InvalidPid(pid_field.to_string()))?;

    let name = record[open + 1..close].to_string();

    let fields: Vec<&str> = record[close + 1..].split_whitespace().collect();
    if fields.len() <= STIME_INDEX {
        return Err(PidStatError::TooFewFields(fields.len()));
    }

    let utime = parse_ticks(fields[UTIME_INDEX])?;
    let stime = parse_ticks(fields[STIME_INDEX])?;

    Ok(ProcessSample {
        pid,
        name,
        cpu_time_total: utime.saturating_add(stime),
    })
}

fn parse_ticks(field: &str) -> Result<u64, PidStatError> {
    field
        .parse::<u64>()
        .map_err(|_| PidStatError::InvalidCpuTime(field.to_string()))
}

/// Reads every listed process. Processes that exit before their record is
/// read, or whose record does not parse, are left out.
pub fn scan(source: &impl ProcSource) -> std::io::Result<Vec<ProcessSample>> {
    let pids = source.list_pids()?;
    let mut samples = Vec::with_capacity(pids.len());

    for pid in pids {
        let record = match source.read_pid_stat(pid) {
            Ok(record) => record,
            Err(err) => {
                trace!(pid, %err, "process vanished before its stat was read");
                continue;
            }
        };
        match parse_pid_stat(record.trim_end()) {
            Ok(sample) => samples.push(sample),
            Err(err) => trace!(pid, %err, "skipping malformed stat record"),
        }
    }

    Ok(samples)
}
