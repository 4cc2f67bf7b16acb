// Shared fixtures and naive reference implementations for the integration tests.

#![allow(dead_code)]

use proptest::strategy::{Strategy, ValueTree};
use proptest::test_runner::TestRunner;

use tastate_core::config::{
    BBandsParams, IndicatorConfig, KamaParams, MacdParams, MidpointParams, MidpriceParams,
    RocParams, RsiParams, SmaParams, SmoothingParams, T3Params, TrimaParams, WmaParams,
};
use tastate_core::overlap::{trima_stage_lengths, BBandsMA, DeviationMultipliers};
use tastate_core::{Float, IndicatorResult, IndicatorValue, Series};

/// Installs a test-writer subscriber once; filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Deterministic random walk starting at 100.
pub fn random_walk(len: usize) -> Vec<Float> {
    let mut runner = TestRunner::deterministic();
    let steps = proptest::collection::vec((-1.0 as Float)..1.0, len)
        .new_tree(&mut runner)
        .expect("strategy never rejects")
        .current();
    cumulative(&steps)
}

/// Price path from a sequence of steps.
pub fn cumulative(steps: &[Float]) -> Vec<Float> {
    let mut price = 100.0;
    steps
        .iter()
        .map(|step| {
            price += step;
            price
        })
        .collect()
}

/// High/low bars around a close path.
pub fn bars(closes: &[Float]) -> (Vec<Float>, Vec<Float>) {
    let high = closes
        .iter()
        .enumerate()
        .map(|(i, c)| c + 0.5 + (i % 3) as Float * 0.25)
        .collect();
    let low = closes
        .iter()
        .enumerate()
        .map(|(i, c)| c - 0.5 - (i % 4) as Float * 0.2)
        .collect();
    (high, low)
}

/// One configuration per indicator, with short periods.
pub fn all_configs() -> Vec<IndicatorConfig> {
    vec![
        IndicatorConfig::Sma(SmaParams { period: 5 }),
        IndicatorConfig::Wma(WmaParams { period: 6 }),
        IndicatorConfig::Ema(SmoothingParams { period: 7, alpha: None }),
        IndicatorConfig::Dema(SmoothingParams { period: 4, alpha: None }),
        IndicatorConfig::Tema(SmoothingParams { period: 4, alpha: Some(0.3) }),
        IndicatorConfig::Trima(TrimaParams { period: 6 }),
        IndicatorConfig::Kama(KamaParams { period: 8 }),
        IndicatorConfig::T3(T3Params { period: 3, volume_factor: 0.7 }),
        IndicatorConfig::Rsi(RsiParams { period: 5 }),
        IndicatorConfig::Macd(MacdParams { fast_period: 3, slow_period: 7, signal_period: 4 }),
        IndicatorConfig::BBands(BBandsParams {
            period: 5,
            multipliers: DeviationMultipliers { up: 2.0, down: 1.5 },
            ma: BBandsMA::Sma,
        }),
        IndicatorConfig::BBands(BBandsParams {
            period: 4,
            multipliers: DeviationMultipliers::default(),
            ma: BBandsMA::Ema(None),
        }),
        IndicatorConfig::Roc(RocParams { period: 3 }),
        IndicatorConfig::Midpoint(MidpointParams { period: 6 }),
        IndicatorConfig::Midprice(MidpriceParams { period: 4 }),
    ]
}

/// Runs `config` over closes, or over bars derived from them.
pub fn run(config: &IndicatorConfig, closes: &[Float], bars: &(Vec<Float>, Vec<Float>)) -> IndicatorResult {
    let series = if config.takes_high_low() {
        Series::HighLow { high: &bars.0, low: &bars.1 }
    } else {
        Series::Values(closes)
    };
    config.batch(series).expect("valid configuration")
}

/// Flattened outputs of one step, in the column order of [`IndicatorResult::columns`].
pub fn flatten(value: &IndicatorValue) -> Vec<Float> {
    match value {
        IndicatorValue::Single(v) => vec![*v],
        IndicatorValue::Macd(m) => vec![m.macd, m.signal, m.histogram],
        IndicatorValue::BBands(b) => vec![b.upper, b.middle, b.lower],
    }
}

/// Row `i` across every column of a batch result.
pub fn row(result: &IndicatorResult, i: usize) -> Vec<Float> {
    result.columns().iter().map(|(_, column)| column[i]).collect()
}

/// Equal, or both NaN.
pub fn same(a: Float, b: Float) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Within `tol` in absolute terms; NaN matches NaN.
pub fn close(actual: Float, expected: Float, tol: Float) -> bool {
    if expected.is_nan() {
        return actual.is_nan();
    }
    (actual - expected).abs() <= tol
}

pub fn assert_close_series(name: &str, actual: &[Float], expected: &[Float], tol: Float) {
    assert_eq!(actual.len(), expected.len(), "{name}: length");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(close(*a, *e, tol), "{name}[{i}]: got {a}, expected {e}");
    }
}

pub fn sma_ref(data: &[Float], period: usize) -> Vec<Float> {
    (0..data.len())
        .map(|i| {
            if i + 1 < period {
                Float::NAN
            } else {
                data[i + 1 - period..=i].iter().sum::<Float>() / period as Float
            }
        })
        .collect()
}

pub fn wma_ref(data: &[Float], period: usize) -> Vec<Float> {
    let divisor = (period * (period + 1)) as Float / 2.0;
    (0..data.len())
        .map(|i| {
            if i + 1 < period {
                return Float::NAN;
            }
            data[i + 1 - period..=i]
                .iter()
                .enumerate()
                .map(|(k, x)| (k + 1) as Float * x)
                .sum::<Float>()
                / divisor
        })
        .collect()
}

/// SMA-seeded EMA that starts at the first non-NaN input, so it chains.
pub fn ema_ref(data: &[Float], period: usize, alpha: Option<Float>) -> Vec<Float> {
    let alpha = alpha.unwrap_or(2.0 / (period as Float + 1.0));
    let mut out = vec![Float::NAN; data.len()];
    let Some(start) = data.iter().position(|x| !x.is_nan()) else {
        return out;
    };
    if data.len() - start < period {
        return out;
    }
    let seed_end = start + period - 1;
    let mut value = data[start..=seed_end].iter().sum::<Float>() / period as Float;
    out[seed_end] = value;
    for i in seed_end + 1..data.len() {
        value += alpha * (data[i] - value);
        out[i] = value;
    }
    out
}

pub fn dema_ref(data: &[Float], period: usize) -> Vec<Float> {
    let e1 = ema_ref(data, period, None);
    let e2 = ema_ref(&e1, period, None);
    e1.iter().zip(&e2).map(|(a, b)| 2.0 * a - b).collect()
}

pub fn tema_ref(data: &[Float], period: usize, alpha: Option<Float>) -> Vec<Float> {
    let e1 = ema_ref(data, period, alpha);
    let e2 = ema_ref(&e1, period, alpha);
    let e3 = ema_ref(&e2, period, alpha);
    (0..data.len())
        .map(|i| 3.0 * e1[i] - 3.0 * e2[i] + e3[i])
        .collect()
}

pub fn t3_ref(data: &[Float], period: usize, v: Float) -> Vec<Float> {
    let mut stages = vec![ema_ref(data, period, None)];
    for _ in 1..6 {
        let next = ema_ref(stages.last().expect("non-empty"), period, None);
        stages.push(next);
    }
    let c1 = -v * v * v;
    let c2 = 3.0 * v * v + 3.0 * v * v * v;
    let c3 = -6.0 * v * v - 3.0 * v - 3.0 * v * v * v;
    let c4 = 1.0 + 3.0 * v + v * v * v + 3.0 * v * v;
    (0..data.len())
        .map(|i| c1 * stages[5][i] + c2 * stages[4][i] + c3 * stages[3][i] + c4 * stages[2][i])
        .collect()
}

pub fn trima_ref(data: &[Float], period: usize) -> Vec<Float> {
    let (n1, n2) = trima_stage_lengths(period);
    let first = sma_ref(data, n1);
    let mut out = vec![Float::NAN; data.len()];
    if data.len() >= n1 {
        let second = sma_ref(&first[n1 - 1..], n2);
        out[n1 - 1..].copy_from_slice(&second);
    }
    out
}

pub fn kama_ref(data: &[Float], period: usize) -> Vec<Float> {
    let fast = 2.0 / 3.0;
    let slow = 2.0 / 31.0;
    let mut out = vec![Float::NAN; data.len()];
    if data.len() <= period {
        return out;
    }
    let mut kama = data[period - 1];
    for i in period..data.len() {
        let direction = data[i] - data[i - period];
        let volatility: Float = (i - period + 1..=i).map(|j| (data[j] - data[j - 1]).abs()).sum();
        let er = if volatility <= direction || volatility.abs() < 1e-8 {
            1.0
        } else {
            (direction / volatility).abs()
        };
        let sc = er * (fast - slow) + slow;
        kama += (data[i] - kama) * sc * sc;
        out[i] = kama;
    }
    out
}

pub fn rsi_ref(data: &[Float], period: usize) -> Vec<Float> {
    let mut out = vec![Float::NAN; data.len()];
    if data.len() <= period {
        return out;
    }
    let n = period as Float;
    let change = |i: usize| data[i] - data[i - 1];
    let mut gain: Float = (1..=period).map(|i| change(i).max(0.0)).sum::<Float>() / n;
    let mut loss: Float = (1..=period).map(|i| (-change(i)).max(0.0)).sum::<Float>() / n;
    let rsi = |g: Float, l: Float| {
        if l == 0.0 {
            if g == 0.0 {
                50.0
            } else {
                100.0
            }
        } else {
            100.0 - 100.0 / (1.0 + g / l)
        }
    };
    out[period] = rsi(gain, loss);
    for i in period + 1..data.len() {
        gain = (gain * (n - 1.0) + change(i).max(0.0)) / n;
        loss = (loss * (n - 1.0) + (-change(i)).max(0.0)) / n;
        out[i] = rsi(gain, loss);
    }
    out
}

/// `(macd, signal, histogram)`, all NaN until the signal line is seeded.
pub fn macd_ref(data: &[Float], fast: usize, slow: usize, signal: usize) -> [Vec<Float>; 3] {
    let len = data.len();
    let offset = slow - fast;
    let mut fast_ema = vec![Float::NAN; len];
    if len > offset {
        fast_ema[offset..].copy_from_slice(&ema_ref(&data[offset..], fast, None));
    }
    let slow_ema = ema_ref(data, slow, None);
    let line: Vec<Float> = (0..len).map(|i| fast_ema[i] - slow_ema[i]).collect();
    let signal_line = ema_ref(&line, signal, None);

    let mut out = [vec![Float::NAN; len], vec![Float::NAN; len], vec![Float::NAN; len]];
    for i in 0..len {
        if !signal_line[i].is_nan() {
            out[0][i] = line[i];
            out[1][i] = signal_line[i];
            out[2][i] = line[i] - signal_line[i];
        }
    }
    out
}

/// `(upper, middle, lower)` over an SMA middle band.
pub fn bbands_ref(data: &[Float], period: usize, up: Float, down: Float) -> [Vec<Float>; 3] {
    let middle = sma_ref(data, period);
    let mut upper = vec![Float::NAN; data.len()];
    let mut lower = vec![Float::NAN; data.len()];
    for i in period - 1..data.len() {
        let window = &data[i + 1 - period..=i];
        let variance = window.iter().map(|x| (x - middle[i]).powi(2)).sum::<Float>() / period as Float;
        let deviation = variance.sqrt();
        upper[i] = middle[i] + up * deviation;
        lower[i] = middle[i] - down * deviation;
    }
    [upper, middle, lower]
}

pub fn roc_ref(data: &[Float], period: usize) -> Vec<Float> {
    (0..data.len())
        .map(|i| {
            if i < period {
                Float::NAN
            } else if data[i - period] == 0.0 {
                0.0
            } else {
                (data[i] - data[i - period]) / data[i - period] * 100.0
            }
        })
        .collect()
}

pub fn midpoint_ref(data: &[Float], period: usize) -> Vec<Float> {
    midprice_ref(data, data, period)
}

pub fn midprice_ref(high: &[Float], low: &[Float], period: usize) -> Vec<Float> {
    (0..high.len())
        .map(|i| {
            if i + 1 < period {
                return Float::NAN;
            }
            let range = i + 1 - period..=i;
            let max = high[range.clone()].iter().copied().fold(Float::MIN, Float::max);
            let min = low[range].iter().copied().fold(Float::MAX, Float::min);
            (max + min) / 2.0
        })
        .collect()
}
