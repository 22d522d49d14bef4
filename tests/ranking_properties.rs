use proptest::prelude::*;

use topcpu::system::baseline::SampleStore;
use topcpu::system::rank::{RankedEntry, select_top};
use topcpu::system::usage::{UsageCalculator, cpu_percent};

fn entries_strategy() -> impl Strategy<Value = Vec<RankedEntry>> {
    prop::collection::btree_map(1u32..100_000, 0u32..=10_000, 0..64).prop_map(|by_pid| {
        by_pid
            .into_iter()
            .map(|(pid, hundredths)| RankedEntry {
                pid,
                name: format!("p{pid}"),
                cpu_percent: f64::from(hundredths) / 100.0,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn output_is_non_increasing(entries in entries_strategy(), n in 0usize..80) {
        let top = select_top(entries, n);
        for pair in top.windows(2) {
            prop_assert!(pair[0].cpu_percent >= pair[1].cpu_percent);
            if pair[0].cpu_percent == pair[1].cpu_percent {
                prop_assert!(pair[0].pid < pair[1].pid);
            }
        }
    }

    #[test]
    fn output_length_is_min_of_n_and_input(entries in entries_strategy(), n in 0usize..80) {
        let expected = n.min(entries.len());
        prop_assert_eq!(select_top(entries, n).len(), expected);
    }

    #[test]
    fn top_n_is_a_prefix_of_the_full_ranking(entries in entries_strategy(), n in 0usize..80) {
        let full = select_top(entries.clone(), entries.len());
        let top = select_top(entries, n);
        prop_assert_eq!(&full[..top.len()], &top[..]);
    }

    #[test]
    fn non_positive_system_delta_is_always_zero(
        counters in prop::collection::vec((1u32..50_000, any::<u64>()), 0..32),
        system_delta in i64::MIN..=0,
    ) {
        let mut store = SampleStore::new();
        let mut calculator = UsageCalculator::new(&mut store);
        for (pid, total) in counters {
            prop_assert_eq!(calculator.percent(pid, total, system_delta), 0.0);
        }
    }

    #[test]
    fn percent_stays_within_bounds(delta in any::<u64>(), system_delta in 1i64..i64::MAX) {
        let percent = cpu_percent(delta, system_delta);
        prop_assert!((0.0..=100.0).contains(&percent));
    }

    #[test]
    fn first_delta_equals_current_counter(pid in 1u32..100_000, total in 0u64..1_000_000) {
        let mut store = SampleStore::new();
        let system_delta = 1_000_000i64;
        let percent = UsageCalculator::new(&mut store).percent(pid, total, system_delta);
        prop_assert_eq!(percent, cpu_percent(total, system_delta));
        prop_assert_eq!(store.get(pid), total);
    }

    #[test]
    fn same_inputs_same_baseline_same_percent(
        previous in 0u64..1_000_000,
        current in 0u64..1_000_000,
        system_delta in -10i64..1_000_000,
    ) {
        let mut first = SampleStore::new();
        first.set(9, previous);
        let mut second = SampleStore::new();
        second.set(9, previous);

        let a = UsageCalculator::new(&mut first).percent(9, current, system_delta);
        let b = UsageCalculator::new(&mut second).percent(9, current, system_delta);
        prop_assert_eq!(a, b);
    }
}
