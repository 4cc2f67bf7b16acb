//! Exponential Moving Average (EMA)
//!
//! Seeded with the SMA of the first `period` samples, then
//! `ema += alpha * (sample - ema)`. Alpha defaults to `2 / (period + 1)`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::accumulators::ExponentialAccumulator;
use crate::driver::{self, check_output, Next};
use crate::error::{check_period, Result, TaError};
use crate::traits::{Indicator, Resettable};
use crate::types::Float;

/// EMA batch result.
#[derive(Debug, Clone)]
pub struct EmaResult {
    /// EMA values, NaN for the first `period - 1` positions
    pub values: Vec<Float>,
    /// State to continue from with [`ema_next`]
    pub state: EmaState,
}

/// EMA calculation state
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EmaState {
    /// Last EMA value
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub ema: Float,
    /// Smoothing accumulator, carries alpha and the seed progress
    pub smoother: ExponentialAccumulator,
    /// Seed length
    pub period: usize,
}

impl_nan_eq!(EmaState { floats: [ema], fields: [smoother, period] });

impl EmaState {
    /// Creates a warming-up state. `alpha` overrides `2 / (period + 1)`.
    pub fn new(period: usize, alpha: Option<Float>) -> Result<Self> {
        Ok(Self {
            ema: Float::NAN,
            smoother: ExponentialAccumulator::new(period, alpha)?,
            period,
        })
    }

    /// Smoothing factor in use.
    pub fn alpha(&self) -> Float {
        self.smoother.alpha()
    }
}

impl Indicator for EmaState {
    type Input = Float;
    type Output = Float;
    const NAME: &'static str = "EMA";

    fn lookback(&self) -> usize {
        self.period - 1
    }

    #[inline]
    fn update(&mut self, sample: Float) -> Float {
        self.ema = self.smoother.push(sample);
        self.ema
    }

    fn is_ready(&self) -> bool {
        self.smoother.is_ready()
    }

    fn validate(&self) -> Result<()> {
        check_period("period", self.period)?;
        self.smoother.validate(Self::NAME)?;
        if self.smoother.period() != self.period {
            return Err(TaError::invalid_state(
                Self::NAME,
                "smoother period does not match period",
            ));
        }
        Ok(())
    }
}

impl Resettable for EmaState {
    fn reset(&mut self) {
        self.ema = Float::NAN;
        self.smoother.reset();
    }
}

/// Computes the EMA of `data`.
///
/// ```rust
/// use tastate_core::overlap::ema;
///
/// let result = ema(&[2.0, 4.0, 6.0, 8.0], 3, None).unwrap();
/// assert_eq!(result.values[2], 4.0);
/// assert_eq!(result.values[3], 6.0);
/// ```
pub fn ema(data: &[Float], period: usize, alpha: Option<Float>) -> Result<EmaResult> {
    let mut values = vec![Float::NAN; data.len()];
    let state = ema_into(data, period, alpha, &mut values)?;
    Ok(EmaResult { values, state })
}

/// Computes the EMA of `data` into `output`.
pub fn ema_into(
    data: &[Float],
    period: usize,
    alpha: Option<Float>,
    output: &mut [Float],
) -> Result<EmaState> {
    check_output("output", output, data.len())?;
    let state = EmaState::new(period, alpha)?;
    Ok(driver::batch_into(state, data.iter().copied(), |i, v| {
        output[i] = v
    }))
}

/// Advances `state` by one sample.
pub fn ema_next(sample: Float, state: &EmaState) -> Result<Next<EmaState>> {
    driver::next(sample, state)
}
