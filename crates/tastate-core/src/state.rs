//! Closed, indicator-agnostic views over the per-indicator types
//!
//! Code that handles indicators chosen at runtime (bindings, configuration
//! files, fan-out over many series) works with these enums instead of a
//! string-keyed registry. Each variant wraps the concrete type, so matching
//! gives back full static typing.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::driver::{self, Next};
use crate::error::{Result, TaError};
use crate::momentum::{
    MacdOutput, MacdResult, MacdState, RocResult, RocState, RsiResult, RsiState,
};
use crate::overlap::{
    BBandsOutput, BBandsResult, BBandsState, DemaResult, DemaState, EmaResult, EmaState,
    KamaResult, KamaState, MidpointResult, MidpointState, MidpriceResult, MidpriceState,
    SmaResult, SmaState, T3Result, T3State, TemaResult, TemaState, TrimaResult, TrimaState,
    WmaResult, WmaState,
};
use crate::traits::{Indicator, Resettable};
use crate::types::{Float, HighLow};

/// One input sample of either kind.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Sample {
    /// A single value
    Value(Float),
    /// A high/low bar, for MIDPRICE
    HighLow(HighLow),
}

impl Sample {
    /// The single value, or an error for a bar.
    pub fn value(&self) -> Result<Float> {
        match *self {
            Sample::Value(v) => Ok(v),
            Sample::HighLow(_) => Err(TaError::invalid_input(
                "expected a single value, got a high/low bar",
            )),
        }
    }

    /// The bar, or an error for a single value.
    pub fn high_low(&self) -> Result<HighLow> {
        match *self {
            Sample::HighLow(bar) => Ok(bar),
            Sample::Value(_) => Err(TaError::invalid_input(
                "expected a high/low bar, got a single value",
            )),
        }
    }
}

impl From<Float> for Sample {
    fn from(value: Float) -> Self {
        Sample::Value(value)
    }
}

impl From<HighLow> for Sample {
    fn from(bar: HighLow) -> Self {
        Sample::HighLow(bar)
    }
}

/// A borrowed input series of either kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Series<'a> {
    /// One value per sample
    Values(&'a [Float]),
    /// Aligned highs and lows
    HighLow {
        /// Bar highs
        high: &'a [Float],
        /// Bar lows
        low: &'a [Float],
    },
}

impl<'a> Series<'a> {
    /// Number of samples.
    pub fn len(&self) -> usize {
        match self {
            Series::Values(v) => v.len(),
            Series::HighLow { high, .. } => high.len(),
        }
    }

    /// Whether the series is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The values, or an error for a high/low series.
    pub fn values(&self) -> Result<&'a [Float]> {
        match *self {
            Series::Values(v) => Ok(v),
            Series::HighLow { .. } => Err(TaError::invalid_input(
                "expected a value series, got high/low series",
            )),
        }
    }

    /// The highs and lows, or an error for a value series.
    pub fn high_low(&self) -> Result<(&'a [Float], &'a [Float])> {
        match *self {
            Series::HighLow { high, low } => Ok((high, low)),
            Series::Values(_) => Err(TaError::invalid_input(
                "expected high/low series, got a value series",
            )),
        }
    }
}

impl<'a> From<&'a [Float]> for Series<'a> {
    fn from(values: &'a [Float]) -> Self {
        Series::Values(values)
    }
}

/// One output of any indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum IndicatorValue {
    /// Single-output indicators
    Single(#[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))] Float),
    /// MACD line, signal and histogram
    Macd(MacdOutput),
    /// Bollinger Bands
    BBands(BBandsOutput),
}

impl IndicatorValue {
    /// The value for single-output indicators.
    pub fn single(&self) -> Option<Float> {
        match *self {
            IndicatorValue::Single(v) => Some(v),
            _ => None,
        }
    }

    /// Whether every component is NaN.
    pub fn is_undefined(&self) -> bool {
        match self {
            IndicatorValue::Single(v) => v.is_nan(),
            IndicatorValue::Macd(m) => m.macd.is_nan() && m.signal.is_nan() && m.histogram.is_nan(),
            IndicatorValue::BBands(b) => b.upper.is_nan() && b.middle.is_nan() && b.lower.is_nan(),
        }
    }
}

const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<IndicatorState>();
    assert_send_sync::<IndicatorResult>();
    assert_send_sync::<IndicatorValue>();
    assert_send_sync::<crate::config::IndicatorConfig>();
    assert_send_sync::<Series<'static>>();
};

/// The state of any indicator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "indicator", rename_all = "UPPERCASE"))]
#[allow(missing_docs)]
pub enum IndicatorState {
    Sma(SmaState),
    Wma(WmaState),
    Ema(EmaState),
    Dema(DemaState),
    Tema(TemaState),
    Trima(TrimaState),
    Kama(KamaState),
    T3(T3State),
    Rsi(RsiState),
    Macd(MacdState),
    BBands(BBandsState),
    Roc(RocState),
    Midpoint(MidpointState),
    Midprice(MidpriceState),
}

macro_rules! with_state {
    ($state:expr, $s:ident => $body:expr) => {
        match $state {
            IndicatorState::Sma($s) => $body,
            IndicatorState::Wma($s) => $body,
            IndicatorState::Ema($s) => $body,
            IndicatorState::Dema($s) => $body,
            IndicatorState::Tema($s) => $body,
            IndicatorState::Trima($s) => $body,
            IndicatorState::Kama($s) => $body,
            IndicatorState::T3($s) => $body,
            IndicatorState::Rsi($s) => $body,
            IndicatorState::Macd($s) => $body,
            IndicatorState::BBands($s) => $body,
            IndicatorState::Roc($s) => $body,
            IndicatorState::Midpoint($s) => $body,
            IndicatorState::Midprice($s) => $body,
        }
    };
}

fn step<S>(sample: S::Input, state: &S, wrap: fn(S) -> IndicatorState) -> Result<(S::Output, IndicatorState)>
where
    S: Indicator,
{
    let Next { value, state } = driver::next(sample, state)?;
    Ok((value, wrap(state)))
}

impl IndicatorState {
    /// Upper-case indicator name.
    pub fn name(&self) -> &'static str {
        fn name_of<S: Indicator>(_: &S) -> &'static str {
            S::NAME
        }
        with_state!(self, s => name_of(s))
    }

    /// Leading samples without a defined output.
    pub fn lookback(&self) -> usize {
        with_state!(self, s => s.lookback())
    }

    /// Whether the warm-up is over.
    pub fn is_ready(&self) -> bool {
        with_state!(self, s => s.is_ready())
    }

    /// Checks internal consistency.
    pub fn validate(&self) -> Result<()> {
        with_state!(self, s => s.validate())
    }

    /// Advances by one sample, returning the output and the new state.
    ///
    /// ```rust
    /// use tastate_core::state::{IndicatorState, IndicatorValue, Sample};
    /// use tastate_core::overlap::SmaState;
    ///
    /// let state = IndicatorState::Sma(SmaState::new(1).unwrap());
    /// let (value, _next) = state.next(Sample::Value(4.0)).unwrap();
    /// assert_eq!(value, IndicatorValue::Single(4.0));
    /// ```
    pub fn next(&self, sample: Sample) -> Result<(IndicatorValue, IndicatorState)> {
        use IndicatorValue::Single;
        match self {
            IndicatorState::Sma(s) => step(sample.value()?, s, IndicatorState::Sma)
                .map(|(v, s)| (Single(v), s)),
            IndicatorState::Wma(s) => step(sample.value()?, s, IndicatorState::Wma)
                .map(|(v, s)| (Single(v), s)),
            IndicatorState::Ema(s) => step(sample.value()?, s, IndicatorState::Ema)
                .map(|(v, s)| (Single(v), s)),
            IndicatorState::Dema(s) => step(sample.value()?, s, IndicatorState::Dema)
                .map(|(v, s)| (Single(v), s)),
            IndicatorState::Tema(s) => step(sample.value()?, s, IndicatorState::Tema)
                .map(|(v, s)| (Single(v), s)),
            IndicatorState::Trima(s) => step(sample.value()?, s, IndicatorState::Trima)
                .map(|(v, s)| (Single(v), s)),
            IndicatorState::Kama(s) => step(sample.value()?, s, IndicatorState::Kama)
                .map(|(v, s)| (Single(v), s)),
            IndicatorState::T3(s) => step(sample.value()?, s, IndicatorState::T3)
                .map(|(v, s)| (Single(v), s)),
            IndicatorState::Rsi(s) => step(sample.value()?, s, IndicatorState::Rsi)
                .map(|(v, s)| (Single(v), s)),
            IndicatorState::Macd(s) => step(sample.value()?, s, IndicatorState::Macd)
                .map(|(v, s)| (IndicatorValue::Macd(v), s)),
            IndicatorState::BBands(s) => step(sample.value()?, s, IndicatorState::BBands)
                .map(|(v, s)| (IndicatorValue::BBands(v), s)),
            IndicatorState::Roc(s) => step(sample.value()?, s, IndicatorState::Roc)
                .map(|(v, s)| (Single(v), s)),
            IndicatorState::Midpoint(s) => step(sample.value()?, s, IndicatorState::Midpoint)
                .map(|(v, s)| (Single(v), s)),
            IndicatorState::Midprice(s) => step(sample.high_low()?, s, IndicatorState::Midprice)
                .map(|(v, s)| (Single(v), s)),
        }
    }
}

impl Resettable for IndicatorState {
    fn reset(&mut self) {
        with_state!(self, s => s.reset())
    }
}

/// The batch result of any indicator.
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub enum IndicatorResult {
    Sma(SmaResult),
    Wma(WmaResult),
    Ema(EmaResult),
    Dema(DemaResult),
    Tema(TemaResult),
    Trima(TrimaResult),
    Kama(KamaResult),
    T3(T3Result),
    Rsi(RsiResult),
    Macd(MacdResult),
    BBands(BBandsResult),
    Roc(RocResult),
    Midpoint(MidpointResult),
    Midprice(MidpriceResult),
}

impl IndicatorResult {
    /// Output values for single-output indicators.
    pub fn values(&self) -> Option<&[Float]> {
        match self {
            IndicatorResult::Sma(r) => Some(&r.values),
            IndicatorResult::Wma(r) => Some(&r.values),
            IndicatorResult::Ema(r) => Some(&r.values),
            IndicatorResult::Dema(r) => Some(&r.values),
            IndicatorResult::Tema(r) => Some(&r.values),
            IndicatorResult::Trima(r) => Some(&r.values),
            IndicatorResult::Kama(r) => Some(&r.values),
            IndicatorResult::T3(r) => Some(&r.values),
            IndicatorResult::Rsi(r) => Some(&r.values),
            IndicatorResult::Roc(r) => Some(&r.values),
            IndicatorResult::Midpoint(r) => Some(&r.values),
            IndicatorResult::Midprice(r) => Some(&r.values),
            IndicatorResult::Macd(_) | IndicatorResult::BBands(_) => None,
        }
    }

    /// Named output columns, in a stable order.
    pub fn columns(&self) -> Vec<(&'static str, &[Float])> {
        match self {
            IndicatorResult::Macd(r) => vec![
                ("macd", r.macd.as_slice()),
                ("signal", r.signal.as_slice()),
                ("histogram", r.histogram.as_slice()),
            ],
            IndicatorResult::BBands(r) => vec![
                ("upper", r.upper.as_slice()),
                ("middle", r.middle.as_slice()),
                ("lower", r.lower.as_slice()),
            ],
            other => other
                .values()
                .map(|v| vec![("values", v)])
                .unwrap_or_default(),
        }
    }

    /// The state after the last sample.
    pub fn state(&self) -> IndicatorState {
        match self {
            IndicatorResult::Sma(r) => IndicatorState::Sma(r.state.clone()),
            IndicatorResult::Wma(r) => IndicatorState::Wma(r.state.clone()),
            IndicatorResult::Ema(r) => IndicatorState::Ema(r.state.clone()),
            IndicatorResult::Dema(r) => IndicatorState::Dema(r.state.clone()),
            IndicatorResult::Tema(r) => IndicatorState::Tema(r.state.clone()),
            IndicatorResult::Trima(r) => IndicatorState::Trima(r.state.clone()),
            IndicatorResult::Kama(r) => IndicatorState::Kama(r.state.clone()),
            IndicatorResult::T3(r) => IndicatorState::T3(r.state.clone()),
            IndicatorResult::Rsi(r) => IndicatorState::Rsi(r.state.clone()),
            IndicatorResult::Macd(r) => IndicatorState::Macd(r.state.clone()),
            IndicatorResult::BBands(r) => IndicatorState::BBands(r.state.clone()),
            IndicatorResult::Roc(r) => IndicatorState::Roc(r.state.clone()),
            IndicatorResult::Midpoint(r) => IndicatorState::Midpoint(r.state.clone()),
            IndicatorResult::Midprice(r) => IndicatorState::Midprice(r.state.clone()),
        }
    }
}
