//! Midpoint over a period (MIDPOINT)
//!
//! `(max + min) / 2` of the last `period` samples.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::accumulators::RollingMinMax;
use crate::driver::{self, check_output, Next};
use crate::error::{check_period, Result, TaError};
use crate::traits::{Indicator, Resettable};
use crate::types::Float;

/// MIDPOINT batch result.
#[derive(Debug, Clone)]
pub struct MidpointResult {
    /// MIDPOINT values, NaN for the first `period - 1` positions
    pub values: Vec<Float>,
    /// State to continue from with [`midpoint_next`]
    pub state: MidpointState,
}

/// MIDPOINT calculation state
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MidpointState {
    /// Last MIDPOINT value
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub midpoint: Float,
    /// Rolling extremes of the samples
    pub extremes: RollingMinMax,
    /// Window length
    pub period: usize,
}

impl_nan_eq!(MidpointState { floats: [midpoint], fields: [extremes, period] });

impl MidpointState {
    /// Creates a warming-up state.
    pub fn new(period: usize) -> Result<Self> {
        check_period("period", period)?;
        Ok(Self {
            midpoint: Float::NAN,
            extremes: RollingMinMax::new(period),
            period,
        })
    }
}

impl Indicator for MidpointState {
    type Input = Float;
    type Output = Float;
    const NAME: &'static str = "MIDPOINT";

    fn lookback(&self) -> usize {
        self.period - 1
    }

    #[inline]
    fn update(&mut self, sample: Float) -> Float {
        let (max, min) = self.extremes.push(sample, sample);
        self.midpoint = (max + min) / 2.0;
        self.midpoint
    }

    fn is_ready(&self) -> bool {
        self.extremes.is_ready()
    }

    fn validate(&self) -> Result<()> {
        check_period("period", self.period)?;
        self.extremes.validate(Self::NAME)?;
        if self.extremes.period() != self.period {
            return Err(TaError::invalid_state(
                Self::NAME,
                "extrema period does not match period",
            ));
        }
        Ok(())
    }
}

impl Resettable for MidpointState {
    fn reset(&mut self) {
        self.midpoint = Float::NAN;
        self.extremes.clear();
    }
}

/// Computes the MIDPOINT of `data`.
///
/// ```rust
/// use tastate_core::overlap::midpoint;
///
/// let result = midpoint(&[1.0, 5.0, 3.0, 2.0], 3).unwrap();
/// assert_eq!(result.values[2], 3.0);
/// assert_eq!(result.values[3], 3.5);
/// ```
pub fn midpoint(data: &[Float], period: usize) -> Result<MidpointResult> {
    let mut values = vec![Float::NAN; data.len()];
    let state = midpoint_into(data, period, &mut values)?;
    Ok(MidpointResult { values, state })
}

/// Computes the MIDPOINT of `data` into `output`.
pub fn midpoint_into(data: &[Float], period: usize, output: &mut [Float]) -> Result<MidpointState> {
    check_output("output", output, data.len())?;
    let state = MidpointState::new(period)?;
    Ok(driver::batch_into(state, data.iter().copied(), |i, v| {
        output[i] = v
    }))
}

/// Advances `state` by one sample.
pub fn midpoint_next(sample: Float, state: &MidpointState) -> Result<Next<MidpointState>> {
    driver::next(sample, state)
}
