//! Double Exponential Moving Average (DEMA)
//!
//! `2 * e1 - e2`, where `e1` is the EMA of the input and `e2` the EMA of `e1`.
//! Each stage starts only once the previous one is seeded, so the first value
//! is at index `2 * (period - 1)`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::accumulators::{cascade_push, ExponentialAccumulator};
use crate::driver::{self, check_output, Next};
use crate::error::{check_period, Result, TaError};
use crate::traits::{Indicator, Resettable};
use crate::types::Float;

/// DEMA batch result.
#[derive(Debug, Clone)]
pub struct DemaResult {
    /// DEMA values, NaN for the first `2 * (period - 1)` positions
    pub values: Vec<Float>,
    /// State to continue from with [`dema_next`]
    pub state: DemaState,
}

/// DEMA calculation state
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DemaState {
    /// Last DEMA value
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub dema: Float,
    /// `[ema(x), ema(ema(x))]`
    pub stages: [ExponentialAccumulator; 2],
    /// Period of both stages
    pub period: usize,
}

impl_nan_eq!(DemaState { floats: [dema], fields: [stages, period] });

impl DemaState {
    /// Creates a warming-up state.
    pub fn new(period: usize, alpha: Option<Float>) -> Result<Self> {
        let stage = ExponentialAccumulator::new(period, alpha)?;
        Ok(Self {
            dema: Float::NAN,
            stages: [stage.clone(), stage],
            period,
        })
    }

    /// Smoothing factor in use.
    pub fn alpha(&self) -> Float {
        self.stages[0].alpha()
    }
}

impl Indicator for DemaState {
    type Input = Float;
    type Output = Float;
    const NAME: &'static str = "DEMA";

    fn lookback(&self) -> usize {
        2 * (self.period - 1)
    }

    #[inline]
    fn update(&mut self, sample: Float) -> Float {
        let e2 = cascade_push(&mut self.stages, sample);
        self.dema = if self.stages[1].is_ready() {
            2.0 * self.stages[0].value() - e2
        } else {
            Float::NAN
        };
        self.dema
    }

    fn is_ready(&self) -> bool {
        self.stages[1].is_ready()
    }

    fn validate(&self) -> Result<()> {
        check_period("period", self.period)?;
        validate_stages(Self::NAME, &self.stages, self.period)
    }
}

impl Resettable for DemaState {
    fn reset(&mut self) {
        self.dema = Float::NAN;
        self.stages.iter_mut().for_each(ExponentialAccumulator::reset);
    }
}

/// Checks every stage of a cascade and that they share `period`.
pub(crate) fn validate_stages(
    indicator: &'static str,
    stages: &[ExponentialAccumulator],
    period: usize,
) -> Result<()> {
    for (k, stage) in stages.iter().enumerate() {
        stage.validate(indicator)?;
        if stage.period() != period {
            return Err(TaError::invalid_state(
                indicator,
                format!("stage {k} has period {}, expected {period}", stage.period()),
            ));
        }
        if k > 0 && !stages[k - 1].is_ready() && stage.is_ready() {
            return Err(TaError::invalid_state(
                indicator,
                format!("stage {k} is seeded before stage {}", k - 1),
            ));
        }
    }
    Ok(())
}

/// Computes the DEMA of `data`.
pub fn dema(data: &[Float], period: usize, alpha: Option<Float>) -> Result<DemaResult> {
    let mut values = vec![Float::NAN; data.len()];
    let state = dema_into(data, period, alpha, &mut values)?;
    Ok(DemaResult { values, state })
}

/// Computes the DEMA of `data` into `output`.
pub fn dema_into(
    data: &[Float],
    period: usize,
    alpha: Option<Float>,
    output: &mut [Float],
) -> Result<DemaState> {
    check_output("output", output, data.len())?;
    let state = DemaState::new(period, alpha)?;
    Ok(driver::batch_into(state, data.iter().copied(), |i, v| {
        output[i] = v
    }))
}

/// Advances `state` by one sample.
pub fn dema_next(sample: Float, state: &DemaState) -> Result<Next<DemaState>> {
    driver::next(sample, state)
}
