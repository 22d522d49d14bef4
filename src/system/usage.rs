use super::baseline::SampleStore;

/// Signed difference between two system counter readings.
///
/// Negative when the counter went backwards (e.g. after a counter reset),
/// which callers treat the same as no progress.
pub fn system_delta(previous: u64, current: u64) -> i64 {
    if current >= previous {
        i64::try_from(current - previous).unwrap_or(i64::MAX)
    } else {
        -i64::try_from(previous - current).unwrap_or(i64::MAX)
    }
}

/// Share of the system-wide interval spent on one process, as a percentage
/// rounded to two decimals.
///
/// The system counter already sums every core, so the percentages of all
/// processes together approach 100 rather than 100 per core. Values above
/// 100 only arise from counter granularity and are clamped.
pub fn cpu_percent(process_delta: u64, system_delta: i64) -> f64 {
    if system_delta <= 0 {
        return 0.0;
    }
    let raw = process_delta as f64 * 100.0 / system_delta as f64;
    ((raw * 100.0).round() / 100.0).clamp(0.0, 100.0)
}

/// Turns cumulative per-process counters into interval percentages against
/// the baselines held in a [`SampleStore`].
pub struct UsageCalculator<'a> {
    store: &'a mut SampleStore,
}

impl<'a> UsageCalculator<'a> {
    pub fn new(store: &'a mut SampleStore) -> Self {
        Self { store }
    }

    /// Computes the percentage for `pid` and records `current_total` as its
    /// new baseline, whatever the result.
    pub fn percent(&mut self, pid: u32, current_total: u64, system_delta: i64) -> f64 {
        let delta = current_total.saturating_sub(self.store.get(pid));
        self.store.set(pid, current_total);
        cpu_percent(delta, system_delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_scenario_is_twenty_percent() {
        let delta = system_delta(950, 1005);
        assert_eq!(delta, 55);

        let mut store = SampleStore::new();
        store.set(42, 200);
        let percent = UsageCalculator::new(&mut store).percent(42, 211, delta);
        assert_eq!(percent, 20.0);
        assert_eq!(store.get(42), 211);
    }

    #[test]
    fn first_sighting_charges_whole_lifetime() {
        let mut store = SampleStore::new();
        let percent = UsageCalculator::new(&mut store).percent(7, 340, 3400);
        assert_eq!(percent, 10.0);
        assert_eq!(store.get(7), 340);
    }

    #[test]
    fn degenerate_interval_reports_zero_and_still_updates_baseline() {
        let mut store = SampleStore::new();
        let mut calc = UsageCalculator::new(&mut store);
        assert_eq!(calc.percent(1, 500, 0), 0.0);
        assert_eq!(calc.percent(2, 500, -12), 0.0);
        assert_eq!(store.get(1), 500);
        assert_eq!(store.get(2), 500);
    }

    #[test]
    fn counter_reset_clamps_delta_to_zero() {
        let mut store = SampleStore::new();
        store.set(9, 1000);
        let percent = UsageCalculator::new(&mut store).percent(9, 10, 100);
        assert_eq!(percent, 0.0);
        assert_eq!(store.get(9), 10);
    }

    #[test]
    fn rounds_to_two_decimals_and_clamps() {
        assert_eq!(cpu_percent(1, 3), 33.33);
        assert_eq!(cpu_percent(2, 3), 66.67);
        assert_eq!(cpu_percent(340, 1), 100.0);
    }

    #[test]
    fn system_delta_is_negative_when_counter_goes_backwards() {
        assert_eq!(system_delta(100, 40), -60);
        assert_eq!(system_delta(7, 7), 0);
    }
}
