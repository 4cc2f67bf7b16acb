// Batch and incremental modes must agree exactly, for every indicator.

mod common;

use proptest::prelude::*;

use common::{all_configs, bars, cumulative, flatten, row, run, same};
use tastate_core::config::BBandsParams;
use tastate_core::overlap::BBandsMA;
use tastate_core::{Float, HighLow, IndicatorConfig, Sample};

fn sample_at(config: &IndicatorConfig, closes: &[Float], bars: &(Vec<Float>, Vec<Float>), i: usize) -> Sample {
    if config.takes_high_low() {
        HighLow::new(bars.0[i], bars.1[i]).into()
    } else {
        closes[i].into()
    }
}

fn slice_bars(bars: &(Vec<Float>, Vec<Float>), end: usize) -> (Vec<Float>, Vec<Float>) {
    (bars.0[..end].to_vec(), bars.1[..end].to_vec())
}

fn walks() -> impl Strategy<Value = Vec<Float>> {
    prop::collection::vec((-2.0 as Float)..2.0, 0..120).prop_map(|steps| cumulative(&steps))
}

proptest! {
    #[test]
    fn batch_prefix_matches_full_batch(closes in walks(), cut in 0usize..120) {
        let cut = cut.min(closes.len());
        let all_bars = bars(&closes);
        for config in all_configs() {
            let full = run(&config, &closes, &all_bars);
            let head = run(&config, &closes[..cut], &slice_bars(&all_bars, cut));
            for i in 0..cut {
                let (a, b) = (row(&head, i), row(&full, i));
                prop_assert!(
                    a.iter().zip(&b).all(|(x, y)| same(*x, *y)),
                    "{} differs at {}: {:?} vs {:?}", config.name(), i, a, b
                );
            }
        }
    }

    #[test]
    fn incremental_continuation_matches_batch(closes in walks(), cut in 0usize..120) {
        let cut = cut.min(closes.len());
        let all_bars = bars(&closes);
        for config in all_configs() {
            let full = run(&config, &closes, &all_bars);
            let mut state = run(&config, &closes[..cut], &slice_bars(&all_bars, cut)).state();

            for i in cut..closes.len() {
                let (value, next) = state
                    .next(sample_at(&config, &closes, &all_bars, i))
                    .expect("state from batch is valid");
                let expected = row(&full, i);
                prop_assert!(
                    flatten(&value).iter().zip(&expected).all(|(x, y)| same(*x, *y)),
                    "{} differs at {}: {:?} vs {:?}", config.name(), i, value, expected
                );
                state = next;
            }
            prop_assert_eq!(state, full.state());
        }
    }

    #[test]
    fn fresh_state_stepping_matches_batch(closes in walks()) {
        let all_bars = bars(&closes);
        for config in all_configs() {
            let full = run(&config, &closes, &all_bars);
            let mut state = config.build().expect("valid configuration");
            for i in 0..closes.len() {
                let (value, next) = state.next(sample_at(&config, &closes, &all_bars, i)).unwrap();
                prop_assert!(flatten(&value).iter().zip(&row(&full, i)).all(|(x, y)| same(*x, *y)));
                state = next;
            }
            prop_assert_eq!(state, full.state());
        }
    }

    #[test]
    fn single_step_from_any_prefix_matches_longer_batch(closes in walks()) {
        let all_bars = bars(&closes);
        for config in all_configs() {
            for k in 0..closes.len() {
                let head = run(&config, &closes[..k], &slice_bars(&all_bars, k)).state();
                let longer = run(&config, &closes[..=k], &slice_bars(&all_bars, k + 1)).state();
                let (_, stepped) = head.next(sample_at(&config, &closes, &all_bars, k)).unwrap();
                prop_assert_eq!(&stepped, &longer, "{} at k = {}", config.name(), k);
                prop_assert_eq!(&head, &head.clone());
            }
        }
    }
}

#[test]
fn nan_inside_window_recovers_for_window_indicators() {
    common::init_tracing();
    let mut closes = common::random_walk(60);
    closes[20] = Float::NAN;
    let all_bars = bars(&closes);
    for config in all_configs() {
        let result = run(&config, &closes, &all_bars);
        let name = config.name();
        let last = row(&result, closes.len() - 1);
        let recovers = match config {
            IndicatorConfig::BBands(BBandsParams { ma, .. }) => ma == BBandsMA::Sma,
            _ => matches!(name, "SMA" | "WMA" | "TRIMA" | "MIDPOINT" | "MIDPRICE" | "ROC"),
        };
        if recovers {
            assert!(last.iter().all(|v| v.is_finite()), "{name} should recover: {last:?}");
        } else {
            assert!(last.iter().all(|v| v.is_nan()), "{name} should stay NaN: {last:?}");
        }
    }
}
