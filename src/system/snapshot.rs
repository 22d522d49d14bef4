use serde::Serialize;

use super::rank::RankedEntry;

/// What one active tick hands to the display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    pub ranked: Vec<RankedEntry>,
    /// Processes that were scanned successfully this tick.
    pub considered: usize,
    pub system_delta: i64,
}
