//! Tillson T3 moving average
//!
//! Six cascaded EMAs combined with coefficients derived from the volume factor
//! `v`:
//!
//! ```text
//! c1 = -v^3
//! c2 = 3v^2 + 3v^3
//! c3 = -6v^2 - 3v - 3v^3
//! c4 = 1 + 3v + v^3 + 3v^2
//! t3 = c1*e6 + c2*e5 + c3*e4 + c4*e3
//! ```
//!
//! First value at index `6 * (period - 1)`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::dema::validate_stages;
use crate::accumulators::{cascade_push, ExponentialAccumulator};
use crate::driver::{self, check_output, Next};
use crate::error::{check_period, Result, TaError};
use crate::traits::{Indicator, Resettable};
use crate::types::Float;

/// Default volume factor.
pub const DEFAULT_VOLUME_FACTOR: Float = 0.7;

/// T3 batch result.
#[derive(Debug, Clone)]
pub struct T3Result {
    /// T3 values, NaN for the first `6 * (period - 1)` positions
    pub values: Vec<Float>,
    /// State to continue from with [`t3_next`]
    pub state: T3State,
}

/// T3 calculation state
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct T3State {
    /// Last T3 value
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub t3: Float,
    /// `[e1, ..., e6]`
    pub stages: [ExponentialAccumulator; 6],
    /// Period of every stage
    pub period: usize,
    /// Volume factor `v`
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub volume_factor: Float,
}

impl_nan_eq!(T3State { floats: [t3, volume_factor], fields: [stages, period] });

impl T3State {
    /// Creates a warming-up state.
    pub fn new(period: usize, volume_factor: Float) -> Result<Self> {
        check_volume_factor(volume_factor)?;
        let stage = ExponentialAccumulator::new(period, None)?;
        Ok(Self {
            t3: Float::NAN,
            stages: std::array::from_fn(|_| stage.clone()),
            period,
            volume_factor,
        })
    }

    /// `[c1, c2, c3, c4]` for the configured volume factor.
    pub fn coefficients(&self) -> [Float; 4] {
        let v = self.volume_factor;
        let v2 = v * v;
        let c1 = -(v2 * v);
        let c2 = 3.0 * (v2 - c1);
        let c3 = -6.0 * v2 - 3.0 * (v - c1);
        let c4 = 1.0 + 3.0 * v - c1 + 3.0 * v2;
        [c1, c2, c3, c4]
    }
}

fn check_volume_factor(v: Float) -> Result<()> {
    if !(0.0..=1.0).contains(&v) {
        return Err(TaError::invalid_parameter(
            "volume_factor",
            v,
            "value in [0.0, 1.0]",
        ));
    }
    Ok(())
}

impl Indicator for T3State {
    type Input = Float;
    type Output = Float;
    const NAME: &'static str = "T3";

    fn lookback(&self) -> usize {
        6 * (self.period - 1)
    }

    #[inline]
    fn update(&mut self, sample: Float) -> Float {
        let e6 = cascade_push(&mut self.stages, sample);
        self.t3 = if self.stages[5].is_ready() {
            let [c1, c2, c3, c4] = self.coefficients();
            c1 * e6
                + c2 * self.stages[4].value()
                + c3 * self.stages[3].value()
                + c4 * self.stages[2].value()
        } else {
            Float::NAN
        };
        self.t3
    }

    fn is_ready(&self) -> bool {
        self.stages[5].is_ready()
    }

    fn validate(&self) -> Result<()> {
        check_period("period", self.period)?;
        check_volume_factor(self.volume_factor)?;
        validate_stages(Self::NAME, &self.stages, self.period)
    }
}

impl Resettable for T3State {
    fn reset(&mut self) {
        self.t3 = Float::NAN;
        self.stages.iter_mut().for_each(ExponentialAccumulator::reset);
    }
}

/// Computes the T3 of `data`.
pub fn t3(data: &[Float], period: usize, volume_factor: Float) -> Result<T3Result> {
    let mut values = vec![Float::NAN; data.len()];
    let state = t3_into(data, period, volume_factor, &mut values)?;
    Ok(T3Result { values, state })
}

/// Computes the T3 of `data` into `output`.
pub fn t3_into(
    data: &[Float],
    period: usize,
    volume_factor: Float,
    output: &mut [Float],
) -> Result<T3State> {
    check_output("output", output, data.len())?;
    let state = T3State::new(period, volume_factor)?;
    Ok(driver::batch_into(state, data.iter().copied(), |i, v| {
        output[i] = v
    }))
}

/// Advances `state` by one sample.
pub fn t3_next(sample: Float, state: &T3State) -> Result<Next<T3State>> {
    driver::next(sample, state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficients_sum_to_one() {
        let state = T3State::new(5, DEFAULT_VOLUME_FACTOR).unwrap();
        let sum: Float = state.coefficients().iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_t3_lookback_and_constant_input() {
        let result = t3(&[4.0; 40], 5, DEFAULT_VOLUME_FACTOR).unwrap();
        assert_eq!(result.state.lookback(), 24);
        assert!(result.values[..24].iter().all(|v| v.is_nan()));
        for v in &result.values[24..] {
            assert!((v - 4.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_t3_zero_volume_factor_is_triple_ema() {
        // with v = 0 only c4 survives, so T3 collapses to e3
        let data: Vec<Float> = (0..50).map(|i| (i as Float * 0.2).sin()).collect();
        let result = t3(&data, 3, 0.0).unwrap();
        assert!((result.values[49] - result.state.stages[2].value()).abs() < 1e-12);
    }

    #[test]
    fn test_t3_rejects_bad_parameters() {
        assert!(t3(&[1.0], 0, 0.7).is_err());
        assert!(matches!(
            t3(&[1.0], 3, Float::NAN),
            Err(TaError::InvalidParameter { .. })
        ));
        for v in [-0.1, 1.5, Float::INFINITY] {
            assert!(matches!(
                T3State::new(3, v),
                Err(TaError::InvalidParameter { .. })
            ));
        }
        assert!(T3State::new(3, 1.0).is_ok());
    }
}
