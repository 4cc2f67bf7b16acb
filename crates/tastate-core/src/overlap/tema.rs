//! Triple Exponential Moving Average (TEMA)
//!
//! `3 * e1 - 3 * e2 + e3` over three cascaded EMAs; first value at index
//! `3 * (period - 1)`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::dema::validate_stages;
use crate::accumulators::{cascade_push, ExponentialAccumulator};
use crate::driver::{self, check_output, Next};
use crate::error::{check_period, Result};
use crate::traits::{Indicator, Resettable};
use crate::types::Float;

/// TEMA batch result.
#[derive(Debug, Clone)]
pub struct TemaResult {
    /// TEMA values, NaN for the first `3 * (period - 1)` positions
    pub values: Vec<Float>,
    /// State to continue from with [`tema_next`]
    pub state: TemaState,
}

/// TEMA calculation state
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TemaState {
    /// Last TEMA value
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub tema: Float,
    /// `[e1, e2, e3]`
    pub stages: [ExponentialAccumulator; 3],
    /// Period of every stage
    pub period: usize,
}

impl_nan_eq!(TemaState { floats: [tema], fields: [stages, period] });

impl TemaState {
    /// Creates a warming-up state.
    pub fn new(period: usize, alpha: Option<Float>) -> Result<Self> {
        let stage = ExponentialAccumulator::new(period, alpha)?;
        Ok(Self {
            tema: Float::NAN,
            stages: [stage.clone(), stage.clone(), stage],
            period,
        })
    }

    /// Smoothing factor in use.
    pub fn alpha(&self) -> Float {
        self.stages[0].alpha()
    }
}

impl Indicator for TemaState {
    type Input = Float;
    type Output = Float;
    const NAME: &'static str = "TEMA";

    fn lookback(&self) -> usize {
        3 * (self.period - 1)
    }

    #[inline]
    fn update(&mut self, sample: Float) -> Float {
        let e3 = cascade_push(&mut self.stages, sample);
        self.tema = if self.stages[2].is_ready() {
            3.0 * self.stages[0].value() - 3.0 * self.stages[1].value() + e3
        } else {
            Float::NAN
        };
        self.tema
    }

    fn is_ready(&self) -> bool {
        self.stages[2].is_ready()
    }

    fn validate(&self) -> Result<()> {
        check_period("period", self.period)?;
        validate_stages(Self::NAME, &self.stages, self.period)
    }
}

impl Resettable for TemaState {
    fn reset(&mut self) {
        self.tema = Float::NAN;
        self.stages.iter_mut().for_each(ExponentialAccumulator::reset);
    }
}

/// Computes the TEMA of `data`.
pub fn tema(data: &[Float], period: usize, alpha: Option<Float>) -> Result<TemaResult> {
    let mut values = vec![Float::NAN; data.len()];
    let state = tema_into(data, period, alpha, &mut values)?;
    Ok(TemaResult { values, state })
}

/// Computes the TEMA of `data` into `output`.
pub fn tema_into(
    data: &[Float],
    period: usize,
    alpha: Option<Float>,
    output: &mut [Float],
) -> Result<TemaState> {
    check_output("output", output, data.len())?;
    let state = TemaState::new(period, alpha)?;
    Ok(driver::batch_into(state, data.iter().copied(), |i, v| {
        output[i] = v
    }))
}

/// Advances `state` by one sample.
pub fn tema_next(sample: Float, state: &TemaState) -> Result<Next<TemaState>> {
    driver::next(sample, state)
}
