// Saved states and configurations survive a JSON round trip.

#![cfg(feature = "serde")]

mod common;

use common::{all_configs, bars, random_walk, row, run, same};
use tastate_core::overlap::{sma, SmaState};
use tastate_core::{Float, IndicatorConfig, IndicatorState, Sample, TaError};

#[test]
fn ready_states_resume_after_json_round_trip() {
    common::init_tracing();
    let closes = random_walk(200);
    let all_bars = bars(&closes);
    for config in all_configs() {
        let full = run(&config, &closes, &all_bars);
        let head = run(
            &config,
            &closes[..150],
            &(all_bars.0[..150].to_vec(), all_bars.1[..150].to_vec()),
        );

        let json = serde_json::to_string(&head.state()).unwrap();
        assert!(json.contains(&format!("\"indicator\":\"{}\"", config.name())));
        let restored: IndicatorState = serde_json::from_str(&json).unwrap();
        restored.validate().unwrap();

        let sample: Sample = if config.takes_high_low() {
            tastate_core::HighLow::new(all_bars.0[150], all_bars.1[150]).into()
        } else {
            closes[150].into()
        };
        assert_eq!(restored, head.state());
        let (value, _) = restored.next(sample).unwrap();
        let expected = row(&full, 150);
        assert!(
            common::flatten(&value).iter().zip(&expected).all(|(a, b)| same(*a, *b)),
            "{}: {:?} vs {:?}",
            config.name(),
            value,
            expected
        );
    }
}

#[test]
fn configs_round_trip() {
    for config in all_configs() {
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(IndicatorConfig::from_json(&json).unwrap(), config);
    }
}

#[test]
fn warming_up_states_round_trip() {
    let state = SmaState::new(3).unwrap();
    let json = serde_json::to_string(&state).unwrap();
    assert!(json.contains("\"sma\":null"));
    assert_eq!(serde_json::from_str::<SmaState>(&json).unwrap(), state);

    let closes = random_walk(40);
    let all_bars = bars(&closes);
    for config in all_configs() {
        let head = run(&config, &closes[..2], &(all_bars.0[..2].to_vec(), all_bars.1[..2].to_vec()));
        let state = head.state();
        assert!(!state.is_ready());
        let restored: IndicatorState = serde_json::from_str(&serde_json::to_string(&state).unwrap()).unwrap();
        assert_eq!(restored, state, "{}", config.name());
    }
}

#[test]
fn states_after_non_finite_samples_round_trip() {
    let mut closes = random_walk(60);
    closes[40] = Float::NAN;
    closes[45] = Float::INFINITY;
    let all_bars = bars(&closes);
    for config in all_configs() {
        let full = run(&config, &closes, &all_bars);
        let head = run(&config, &closes[..50], &(all_bars.0[..50].to_vec(), all_bars.1[..50].to_vec()));
        let json = serde_json::to_string(&head.state()).unwrap();
        let mut state: IndicatorState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, head.state(), "{}", config.name());
        for i in 50..closes.len() {
            let sample: Sample = if config.takes_high_low() {
                tastate_core::HighLow::new(all_bars.0[i], all_bars.1[i]).into()
            } else {
                closes[i].into()
            };
            state = state.next(sample).unwrap().1;
        }
        assert_eq!(state, full.state(), "{}", config.name());
    }
}

#[test]
fn edited_state_is_rejected_on_resume() {
    let result = sma(&[1.0, 2.0, 3.0, 4.0], 3).unwrap();
    let mut value = serde_json::to_value(&result.state).unwrap();
    value["period"] = serde_json::json!(5);
    let edited: SmaState = serde_json::from_value(value).unwrap();
    assert!(matches!(
        tastate_core::overlap::sma_next(5.0, &edited),
        Err(TaError::InvalidState { .. })
    ));
}
