// Independent states on independent threads give the same results as a
// single thread.

mod common;

use std::thread;

use common::{bars, random_walk, row, run, same};
use tastate_core::config::{MacdParams, RsiParams, SmaParams};
use tastate_core::{Float, IndicatorConfig, Sample};

fn run_on_threads(config: IndicatorConfig, series: Vec<Vec<Float>>) -> Vec<Vec<Vec<Float>>> {
    let handles: Vec<_> = series
        .into_iter()
        .map(|closes| {
            thread::spawn(move || {
                let result = run(&config, &closes, &bars(&closes));
                (0..closes.len()).map(|i| row(&result, i)).collect::<Vec<_>>()
            })
        })
        .collect();
    handles.into_iter().map(|h| h.join().expect("worker panicked")).collect()
}

#[test]
fn four_threads_match_sequential() {
    let config = IndicatorConfig::Macd(MacdParams::default());
    let data = random_walk(4 * 5_000);
    let series: Vec<Vec<Float>> = data.chunks(5_000).map(<[Float]>::to_vec).collect();

    let threaded = run_on_threads(config, series.clone());
    for (closes, rows) in series.iter().zip(&threaded) {
        let sequential = run(&config, closes, &bars(closes));
        for (i, r) in rows.iter().enumerate() {
            assert!(r.iter().zip(&row(&sequential, i)).all(|(a, b)| same(*a, *b)));
        }
    }
}

#[test]
fn states_move_between_threads() {
    let config = IndicatorConfig::Rsi(RsiParams { period: 14 });
    let closes = random_walk(2_000);
    let full = run(&config, &closes, &bars(&closes));

    let head = run(&config, &closes[..1_000], &bars(&closes[..1_000])).state();
    let tail = closes[1_000..].to_vec();
    let state = thread::spawn(move || {
        tail.iter().fold(head, |state, x| {
            state.next(Sample::Value(*x)).expect("valid state").1
        })
    })
    .join()
    .expect("worker panicked");

    assert_eq!(state, full.state());
}

#[cfg(feature = "parallel")]
#[test]
fn rayon_fan_out_matches_threads() {
    use tastate_core::parallel::batch_many;
    use tastate_core::Series;

    let config = IndicatorConfig::Sma(SmaParams { period: 20 });
    let data = random_walk(8 * 1_000);
    let series: Vec<Series<'_>> = data.chunks(1_000).map(Series::Values).collect();
    let results = batch_many(&config, &series).unwrap();
    let threaded = run_on_threads(config, data.chunks(1_000).map(<[Float]>::to_vec).collect());
    for (result, rows) in results.iter().zip(&threaded) {
        let values = result.values().unwrap();
        assert!(values.iter().zip(rows).all(|(v, r)| same(*v, r[0])));
    }
}

fn sma_on_four_threads(len: usize) {
    use std::sync::Arc;
    use tastate_core::overlap::sma;

    let data: Arc<Vec<Float>> = Arc::new(random_walk(len));
    let expected = sma(&data, 30).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let data = Arc::clone(&data);
            thread::spawn(move || sma(&data, 30).unwrap())
        })
        .collect();
    for handle in handles {
        let result = handle.join().expect("worker panicked");
        assert!(result.values.iter().zip(&expected.values).all(|(a, b)| same(*a, *b)));
        assert_eq!(result.state, expected.state);
    }
}

#[test]
fn four_threads_sma_shared_input() {
    sma_on_four_threads(200_000);
}

#[test]
#[ignore = "ten million samples per thread"]
fn four_threads_ten_million_samples() {
    sma_on_four_threads(10_000_000);
}
