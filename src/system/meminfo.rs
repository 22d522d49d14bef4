use thiserror::Error;

/// The four `meminfo` fields needed for the "used" figure, in kB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemInfo {
    pub total_kb: u64,
    pub free_kb: u64,
    pub buffers_kb: u64,
    pub cached_kb: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeminfoError {
    #[error("meminfo is missing `{0}`")]
    MissingField(&'static str),
    #[error("invalid value for `{field}`: `{value}`")]
    InvalidValue { field: &'static str, value: String },
}

const FIELDS: [&str; 4] = ["MemTotal", "MemFree", "Buffers", "Cached"];

impl MemInfo {
    pub fn parse(contents: &str) -> Result<Self, MeminfoError> {
        let mut values: [Option<u64>; 4] = [None; 4];

        for line in contents.lines() {
            let Some((label, rest)) = line.split_once(':') else {
                continue;
            };
            let Some(slot) = FIELDS.iter().position(|field| *field == label.trim()) else {
                continue;
            };
            let raw = rest.split_whitespace().next().unwrap_or_default();
            let value = raw.parse::<u64>().map_err(|_| MeminfoError::InvalidValue {
                field: FIELDS[slot],
                value: raw.to_string(),
            })?;
            values[slot] = Some(value);
        }

        let field = |slot: usize| values[slot].ok_or(MeminfoError::MissingField(FIELDS[slot]));
        Ok(MemInfo {
            total_kb: field(0)?,
            free_kb: field(1)?,
            buffers_kb: field(2)?,
            cached_kb: field(3)?,
        })
    }

    pub fn used_kb(&self) -> u64 {
        self.total_kb
            .saturating_sub(self.free_kb)
            .saturating_sub(self.buffers_kb)
            .saturating_sub(self.cached_kb)
    }

    pub fn used_percent(&self) -> f64 {
        if self.total_kb == 0 {
            return 0.0;
        }
        self.used_kb() as f64 * 100.0 / self.total_kb as f64
    }
}
