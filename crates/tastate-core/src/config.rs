//! Runtime indicator configuration
//!
//! [`IndicatorConfig`] is a closed enum of parameter sets, one variant per
//! indicator. With the `serde` feature it decodes from documents tagged by an
//! `"indicator"` field; omitted parameters take the usual TA-Lib defaults.
//!
//! ```rust
//! # #[cfg(feature = "serde")] {
//! use tastate_core::config::IndicatorConfig;
//!
//! let config = IndicatorConfig::from_json(r#"{"indicator": "MACD", "signal_period": 5}"#).unwrap();
//! let state = config.build().unwrap();
//! assert_eq!(state.lookback(), 25 + 4);
//! # }
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::momentum::{macd, roc, rsi, MacdState, RocState, RsiState};
use crate::overlap::{
    bbands, dema, ema, kama, midpoint, midprice, sma, t3, tema, trima, wma, BBandsMA, BBandsState,
    DemaState, DeviationMultipliers, EmaState, KamaState, MidpointState, MidpriceState, SmaState,
    T3State, TemaState, TrimaState, WmaState, DEFAULT_VOLUME_FACTOR,
};
use crate::state::{IndicatorResult, IndicatorState, Series};
use crate::types::Float;

macro_rules! period_params {
    ($(#[$doc:meta] $name:ident = $default:expr;)*) => {
        $(
            #[$doc]
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
            #[cfg_attr(feature = "serde", serde(default))]
            pub struct $name {
                /// Indicator period
                pub period: usize,
            }

            impl Default for $name {
                fn default() -> Self {
                    Self { period: $default }
                }
            }
        )*
    };
}

period_params! {
    /// SMA parameters
    SmaParams = 30;
    /// WMA parameters
    WmaParams = 30;
    /// TRIMA parameters
    TrimaParams = 30;
    /// KAMA parameters
    KamaParams = 30;
    /// RSI parameters
    RsiParams = 14;
    /// ROC parameters
    RocParams = 10;
    /// MIDPOINT parameters
    MidpointParams = 14;
    /// MIDPRICE parameters
    MidpriceParams = 14;
}

/// Parameters of the EMA family (EMA, DEMA, TEMA).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SmoothingParams {
    /// Seed length and, unless `alpha` is set, source of the smoothing factor
    pub period: usize,
    /// Smoothing factor overriding `2 / (period + 1)`
    pub alpha: Option<Float>,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            period: 30,
            alpha: None,
        }
    }
}

/// T3 parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct T3Params {
    /// Period of each EMA stage
    pub period: usize,
    /// Volume factor
    pub volume_factor: Float,
}

impl Default for T3Params {
    fn default() -> Self {
        Self {
            period: 5,
            volume_factor: DEFAULT_VOLUME_FACTOR,
        }
    }
}

/// MACD parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MacdParams {
    /// Fast EMA period
    pub fast_period: usize,
    /// Slow EMA period
    pub slow_period: usize,
    /// Signal EMA period
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// BBANDS parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BBandsParams {
    /// Window length
    pub period: usize,
    /// Band multipliers
    pub multipliers: DeviationMultipliers,
    /// Middle-band average
    pub ma: BBandsMA,
}

impl Default for BBandsParams {
    fn default() -> Self {
        Self {
            period: 5,
            multipliers: DeviationMultipliers::default(),
            ma: BBandsMA::Sma,
        }
    }
}

/// Parameter set of any indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "indicator", rename_all = "UPPERCASE"))]
#[allow(missing_docs)]
pub enum IndicatorConfig {
    Sma(SmaParams),
    Wma(WmaParams),
    Ema(SmoothingParams),
    Dema(SmoothingParams),
    Tema(SmoothingParams),
    Trima(TrimaParams),
    Kama(KamaParams),
    T3(T3Params),
    Rsi(RsiParams),
    Macd(MacdParams),
    BBands(BBandsParams),
    Roc(RocParams),
    Midpoint(MidpointParams),
    Midprice(MidpriceParams),
}

impl IndicatorConfig {
    /// Decodes and validates a JSON configuration.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|err| {
            tracing::debug!(%err, "configuration rejected by decoder");
            err
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Upper-case indicator name.
    pub fn name(&self) -> &'static str {
        match self {
            IndicatorConfig::Sma(_) => "SMA",
            IndicatorConfig::Wma(_) => "WMA",
            IndicatorConfig::Ema(_) => "EMA",
            IndicatorConfig::Dema(_) => "DEMA",
            IndicatorConfig::Tema(_) => "TEMA",
            IndicatorConfig::Trima(_) => "TRIMA",
            IndicatorConfig::Kama(_) => "KAMA",
            IndicatorConfig::T3(_) => "T3",
            IndicatorConfig::Rsi(_) => "RSI",
            IndicatorConfig::Macd(_) => "MACD",
            IndicatorConfig::BBands(_) => "BBANDS",
            IndicatorConfig::Roc(_) => "ROC",
            IndicatorConfig::Midpoint(_) => "MIDPOINT",
            IndicatorConfig::Midprice(_) => "MIDPRICE",
        }
    }

    /// Whether the indicator consumes high/low bars.
    pub fn takes_high_low(&self) -> bool {
        matches!(self, IndicatorConfig::Midprice(_))
    }

    /// Checks the parameters without keeping the state.
    pub fn validate(&self) -> Result<()> {
        self.build().map(|_| ())
    }

    /// Builds a fresh warming-up state.
    pub fn build(&self) -> Result<IndicatorState> {
        let state = match *self {
            IndicatorConfig::Sma(p) => SmaState::new(p.period).map(IndicatorState::Sma),
            IndicatorConfig::Wma(p) => WmaState::new(p.period).map(IndicatorState::Wma),
            IndicatorConfig::Ema(p) => EmaState::new(p.period, p.alpha).map(IndicatorState::Ema),
            IndicatorConfig::Dema(p) => DemaState::new(p.period, p.alpha).map(IndicatorState::Dema),
            IndicatorConfig::Tema(p) => TemaState::new(p.period, p.alpha).map(IndicatorState::Tema),
            IndicatorConfig::Trima(p) => TrimaState::new(p.period).map(IndicatorState::Trima),
            IndicatorConfig::Kama(p) => KamaState::new(p.period).map(IndicatorState::Kama),
            IndicatorConfig::T3(p) => T3State::new(p.period, p.volume_factor).map(IndicatorState::T3),
            IndicatorConfig::Rsi(p) => RsiState::new(p.period).map(IndicatorState::Rsi),
            IndicatorConfig::Macd(p) => MacdState::new(p.fast_period, p.slow_period, p.signal_period)
                .map(IndicatorState::Macd),
            IndicatorConfig::BBands(p) => {
                BBandsState::new(p.period, p.multipliers, p.ma).map(IndicatorState::BBands)
            }
            IndicatorConfig::Roc(p) => RocState::new(p.period).map(IndicatorState::Roc),
            IndicatorConfig::Midpoint(p) => MidpointState::new(p.period).map(IndicatorState::Midpoint),
            IndicatorConfig::Midprice(p) => MidpriceState::new(p.period).map(IndicatorState::Midprice),
        };
        if let Err(err) = &state {
            tracing::debug!(indicator = self.name(), %err, "configuration rejected");
        }
        state
    }

    /// Runs the configured indicator over a whole series.
    pub fn batch(&self, series: Series<'_>) -> Result<IndicatorResult> {
        tracing::debug!(indicator = self.name(), len = series.len(), "batch started");
        let result = match *self {
            IndicatorConfig::Sma(p) => IndicatorResult::Sma(sma(series.values()?, p.period)?),
            IndicatorConfig::Wma(p) => IndicatorResult::Wma(wma(series.values()?, p.period)?),
            IndicatorConfig::Ema(p) => IndicatorResult::Ema(ema(series.values()?, p.period, p.alpha)?),
            IndicatorConfig::Dema(p) => {
                IndicatorResult::Dema(dema(series.values()?, p.period, p.alpha)?)
            }
            IndicatorConfig::Tema(p) => {
                IndicatorResult::Tema(tema(series.values()?, p.period, p.alpha)?)
            }
            IndicatorConfig::Trima(p) => IndicatorResult::Trima(trima(series.values()?, p.period)?),
            IndicatorConfig::Kama(p) => IndicatorResult::Kama(kama(series.values()?, p.period)?),
            IndicatorConfig::T3(p) => {
                IndicatorResult::T3(t3(series.values()?, p.period, p.volume_factor)?)
            }
            IndicatorConfig::Rsi(p) => IndicatorResult::Rsi(rsi(series.values()?, p.period)?),
            IndicatorConfig::Macd(p) => IndicatorResult::Macd(macd(
                series.values()?,
                p.fast_period,
                p.slow_period,
                p.signal_period,
            )?),
            IndicatorConfig::BBands(p) => {
                IndicatorResult::BBands(bbands(series.values()?, p.period, p.multipliers, p.ma)?)
            }
            IndicatorConfig::Roc(p) => IndicatorResult::Roc(roc(series.values()?, p.period)?),
            IndicatorConfig::Midpoint(p) => {
                IndicatorResult::Midpoint(midpoint(series.values()?, p.period)?)
            }
            IndicatorConfig::Midprice(p) => {
                let (high, low) = series.high_low()?;
                IndicatorResult::Midprice(midprice(high, low, p.period)?)
            }
        };
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaError;

    #[test]
    fn test_defaults() {
        assert_eq!(SmaParams::default().period, 30);
        assert_eq!(RsiParams::default().period, 14);
        assert_eq!(RocParams::default().period, 10);
        assert_eq!(MacdParams::default(), MacdParams { fast_period: 12, slow_period: 26, signal_period: 9 });
        assert_eq!(T3Params::default().volume_factor, 0.7);
        assert_eq!(BBandsParams::default().period, 5);
    }

    #[test]
    fn test_build_rejects_invalid() {
        let config = IndicatorConfig::Macd(MacdParams {
            fast_period: 30,
            ..MacdParams::default()
        });
        assert!(matches!(config.validate(), Err(TaError::InvalidParameter { .. })));
        assert!(IndicatorConfig::Sma(SmaParams { period: 0 }).build().is_err());
    }

    #[test]
    fn test_batch_checks_series_kind() {
        let data = [1.0, 2.0, 3.0];
        let config = IndicatorConfig::Midprice(MidpriceParams { period: 2 });
        assert!(config.batch(Series::Values(&data)).is_err());
        let result = config
            .batch(Series::HighLow { high: &data, low: &data })
            .unwrap();
        assert_eq!(result.values().unwrap()[2], 2.5);
    }

    #[test]
    fn test_batch_state_continues_with_next() {
        let data: Vec<Float> = (0..30).map(|i| (i as Float * 0.5).cos()).collect();
        let config = IndicatorConfig::Kama(KamaParams { period: 5 });
        let head = config.batch(Series::Values(&data[..29])).unwrap();
        let (value, state) = head.state().next(data[29].into()).unwrap();
        let full = config.batch(Series::Values(&data)).unwrap();
        assert_eq!(value.single(), Some(full.values().unwrap()[29]));
        assert_eq!(state, full.state());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_defaults_and_tags() {
        let config = IndicatorConfig::from_json(r#"{"indicator": "RSI"}"#).unwrap();
        assert_eq!(config, IndicatorConfig::Rsi(RsiParams { period: 14 }));

        let config =
            IndicatorConfig::from_json(r#"{"indicator": "EMA", "period": 10, "alpha": 0.5}"#)
                .unwrap();
        assert_eq!(
            config,
            IndicatorConfig::Ema(SmoothingParams { period: 10, alpha: Some(0.5) })
        );

        let config = IndicatorConfig::from_json(
            r#"{"indicator": "BBANDS", "period": 20, "ma": {"ema": null}, "multipliers": {"up": 1.5, "down": 2.5}}"#,
        )
        .unwrap();
        assert_eq!(config.name(), "BBANDS");
        assert_eq!(config.build().unwrap().lookback(), 19);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_errors() {
        assert!(matches!(
            IndicatorConfig::from_json(r#"{"indicator": "NOPE"}"#),
            Err(TaError::Config { .. })
        ));
        assert!(matches!(
            IndicatorConfig::from_json(r#"{"indicator": "SMA", "period": 0}"#),
            Err(TaError::InvalidPeriod { .. })
        ));
    }
}
