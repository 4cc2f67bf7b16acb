//! Bollinger Bands (BBANDS)
//!
//! A middle band (SMA, or an SMA-seeded EMA) with upper and lower bands at a
//! multiple of the population standard deviation of the last `period`
//! samples. The deviation is `sqrt(E[x^2] - E[x]^2)`, clamped to zero when
//! rounding makes the variance negative.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::accumulators::{ExponentialAccumulator, SlidingWindow};
use crate::driver::{self, check_output, Next};
use crate::error::{check_period, Result, TaError};
use crate::traits::{Indicator, Resettable};
use crate::types::Float;

/// Moving average used for the middle band.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BBandsMA {
    /// Simple moving average
    #[default]
    Sma,
    /// Exponential moving average, with an optional alpha overriding `2 / (period + 1)`
    Ema(Option<Float>),
}

/// Standard-deviation multipliers for the outer bands.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviationMultipliers {
    /// Multiplier of the upper band
    pub up: Float,
    /// Multiplier of the lower band
    pub down: Float,
}

impl Default for DeviationMultipliers {
    fn default() -> Self {
        Self { up: 2.0, down: 2.0 }
    }
}

impl DeviationMultipliers {
    fn check(&self) -> Result<()> {
        for (name, value) in [("up", self.up), ("down", self.down)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(TaError::invalid_parameter(
                    format!("multipliers.{name}"),
                    value,
                    "a positive finite number",
                ));
            }
        }
        Ok(())
    }
}

/// One BBANDS output.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BBandsOutput {
    /// Upper band
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub upper: Float,
    /// Middle band
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub middle: Float,
    /// Lower band
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub lower: Float,
}

impl BBandsOutput {
    const UNDEFINED: Self = Self {
        upper: Float::NAN,
        middle: Float::NAN,
        lower: Float::NAN,
    };
}

/// BBANDS batch result.
#[derive(Debug, Clone)]
pub struct BBandsResult {
    /// Upper band values
    pub upper: Vec<Float>,
    /// Middle band values
    pub middle: Vec<Float>,
    /// Lower band values
    pub lower: Vec<Float>,
    /// State to continue from with [`bbands_next`]
    pub state: BBandsState,
}

/// BBANDS calculation state
///
/// **Last outputs**
/// - `upper`, `middle`, `lower`
///
/// **State values**
/// - `window`: last `period` samples with sum and sum of squares
/// - `ema`: the middle-band smoother when `ma` is [`BBandsMA::Ema`]
///
/// **Parameters**
/// - `period`, `multipliers`, `ma`
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BBandsState {
    /// Last upper band
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub upper: Float,
    /// Last middle band
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub middle: Float,
    /// Last lower band
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub lower: Float,
    /// Last `period` samples
    pub window: SlidingWindow,
    /// Middle-band EMA, present only for [`BBandsMA::Ema`]
    pub ema: Option<ExponentialAccumulator>,
    /// Band period
    pub period: usize,
    /// Deviation multipliers
    pub multipliers: DeviationMultipliers,
    /// Middle-band average
    pub ma: BBandsMA,
}

impl_nan_eq!(BBandsState { floats: [upper, middle, lower], fields: [window, ema, period, multipliers, ma] });

impl BBandsState {
    /// Creates a warming-up state.
    pub fn new(period: usize, multipliers: DeviationMultipliers, ma: BBandsMA) -> Result<Self> {
        check_period("period", period)?;
        multipliers.check()?;
        let ema = match ma {
            BBandsMA::Sma => None,
            BBandsMA::Ema(alpha) => Some(ExponentialAccumulator::new(period, alpha)?),
        };
        Ok(Self {
            upper: Float::NAN,
            middle: Float::NAN,
            lower: Float::NAN,
            window: SlidingWindow::new(period),
            ema,
            period,
            multipliers,
            ma,
        })
    }

    fn output(&self) -> BBandsOutput {
        BBandsOutput {
            upper: self.upper,
            middle: self.middle,
            lower: self.lower,
        }
    }
}

impl Indicator for BBandsState {
    type Input = Float;
    type Output = BBandsOutput;
    const NAME: &'static str = "BBANDS";

    fn lookback(&self) -> usize {
        self.period - 1
    }

    #[inline]
    fn update(&mut self, sample: Float) -> BBandsOutput {
        self.window.push(sample);
        let ema = self.ema.as_mut().map(|ema| ema.push(sample));

        if !self.window.is_full() {
            return BBandsOutput::UNDEFINED;
        }

        let n = self.period as Float;
        let mean = self.window.sum() / n;
        let variance = self.window.sum_sq() / n - mean * mean;
        let deviation = if variance > 0.0 { variance.sqrt() } else { 0.0 };

        self.middle = ema.unwrap_or(mean);
        self.upper = self.middle + self.multipliers.up * deviation;
        self.lower = self.middle - self.multipliers.down * deviation;
        self.output()
    }

    fn is_ready(&self) -> bool {
        self.window.is_full()
    }

    fn validate(&self) -> Result<()> {
        check_period("period", self.period)?;
        self.multipliers.check()?;
        self.window.validate(Self::NAME)?;
        if self.window.capacity() != self.period {
            return Err(TaError::invalid_state(
                Self::NAME,
                "window capacity does not match period",
            ));
        }
        match (&self.ma, &self.ema) {
            (BBandsMA::Sma, None) => Ok(()),
            (BBandsMA::Ema(_), Some(ema)) => {
                ema.validate(Self::NAME)?;
                if ema.period() != self.period {
                    return Err(TaError::invalid_state(
                        Self::NAME,
                        "middle-band EMA period does not match period",
                    ));
                }
                Ok(())
            }
            _ => Err(TaError::invalid_state(
                Self::NAME,
                "middle-band smoother does not match the selected average",
            )),
        }
    }
}

impl Resettable for BBandsState {
    fn reset(&mut self) {
        self.upper = Float::NAN;
        self.middle = Float::NAN;
        self.lower = Float::NAN;
        self.window.clear();
        if let Some(ema) = self.ema.as_mut() {
            ema.reset();
        }
    }
}

/// Computes Bollinger Bands over `data`.
///
/// ```rust
/// use tastate_core::overlap::{bbands, BBandsMA, DeviationMultipliers};
///
/// let result = bbands(&[1.0, 3.0, 1.0, 3.0], 2, DeviationMultipliers::default(), BBandsMA::Sma)
///     .unwrap();
/// assert_eq!(result.middle[1], 2.0);
/// assert_eq!(result.upper[1], 4.0);
/// assert_eq!(result.lower[1], 0.0);
/// ```
pub fn bbands(
    data: &[Float],
    period: usize,
    multipliers: DeviationMultipliers,
    ma: BBandsMA,
) -> Result<BBandsResult> {
    let mut upper = vec![Float::NAN; data.len()];
    let mut middle = vec![Float::NAN; data.len()];
    let mut lower = vec![Float::NAN; data.len()];
    let state = bbands_into(
        data,
        period,
        multipliers,
        ma,
        &mut upper,
        &mut middle,
        &mut lower,
    )?;
    Ok(BBandsResult {
        upper,
        middle,
        lower,
        state,
    })
}

/// Computes Bollinger Bands into three caller-provided buffers.
pub fn bbands_into(
    data: &[Float],
    period: usize,
    multipliers: DeviationMultipliers,
    ma: BBandsMA,
    upper: &mut [Float],
    middle: &mut [Float],
    lower: &mut [Float],
) -> Result<BBandsState> {
    check_output("upper", upper, data.len())?;
    check_output("middle", middle, data.len())?;
    check_output("lower", lower, data.len())?;
    let state = BBandsState::new(period, multipliers, ma)?;
    Ok(driver::batch_into(state, data.iter().copied(), |i, out| {
        upper[i] = out.upper;
        middle[i] = out.middle;
        lower[i] = out.lower;
    }))
}

/// Advances `state` by one sample.
pub fn bbands_next(sample: Float, state: &BBandsState) -> Result<Next<BBandsState, BBandsOutput>> {
    driver::next(sample, state)
}
