//! Relative Strength Index (RSI)
//!
//! Wilder-smoothed average gain and loss over `period` one-step changes:
//!
//! ```text
//! avg' = (avg * (period - 1) + change) / period
//! rsi  = 100 - 100 / (1 + avg_gain / avg_loss)
//! ```
//!
//! The averages are seeded with the plain mean of the first `period` changes,
//! so the first value is at index `period`. A zero average loss gives 100,
//! unless the average gain is zero too, which gives 50.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::driver::{self, check_output, Next};
use crate::error::{check_period, Result, TaError};
use crate::traits::{Indicator, Resettable};
use crate::types::Float;

/// RSI batch result.
#[derive(Debug, Clone)]
pub struct RsiResult {
    /// RSI values in `[0, 100]`, NaN for the first `period` positions
    pub values: Vec<Float>,
    /// State to continue from with [`rsi_next`]
    pub state: RsiState,
}

/// RSI calculation state
///
/// **Last output**
/// - `rsi`
///
/// **State values**
/// - `prev_value`: the last sample, differenced against the next one
/// - `avg_gain`, `avg_loss`: smoothed averages; running sums while warming up
/// - `count`: samples seen, saturating at `period + 1`
///
/// **Parameters**
/// - `period`
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RsiState {
    /// Last RSI value
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub rsi: Float,
    /// Last sample
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub prev_value: Float,
    /// Average gain
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub avg_gain: Float,
    /// Average loss, as a positive number
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub avg_loss: Float,
    /// Samples seen, saturating at `period + 1`
    pub count: usize,
    /// Smoothing period
    pub period: usize,
}

impl_nan_eq!(RsiState { floats: [rsi, prev_value, avg_gain, avg_loss], fields: [count, period] });

impl RsiState {
    /// Creates a warming-up state.
    pub fn new(period: usize) -> Result<Self> {
        check_period("period", period)?;
        Ok(Self {
            rsi: Float::NAN,
            prev_value: Float::NAN,
            avg_gain: 0.0,
            avg_loss: 0.0,
            count: 0,
            period,
        })
    }
}

#[inline(always)]
fn split_change(change: Float) -> (Float, Float) {
    if change.is_nan() {
        (Float::NAN, Float::NAN)
    } else if change > 0.0 {
        (change, 0.0)
    } else {
        (0.0, -change)
    }
}

#[inline(always)]
fn relative_strength(avg_gain: Float, avg_loss: Float) -> Float {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return 50.0;
        }
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

impl Indicator for RsiState {
    type Input = Float;
    type Output = Float;
    const NAME: &'static str = "RSI";

    fn lookback(&self) -> usize {
        self.period
    }

    #[inline]
    fn update(&mut self, sample: Float) -> Float {
        if self.count == 0 {
            self.prev_value = sample;
            self.count = 1;
            return Float::NAN;
        }

        let (gain, loss) = split_change(sample - self.prev_value);
        self.prev_value = sample;
        let n = self.period as Float;

        if self.count <= self.period {
            self.avg_gain += gain;
            self.avg_loss += loss;
            self.count += 1;
            if self.count <= self.period {
                return Float::NAN;
            }
            self.avg_gain /= n;
            self.avg_loss /= n;
        } else {
            self.avg_gain = (self.avg_gain * (n - 1.0) + gain) / n;
            self.avg_loss = (self.avg_loss * (n - 1.0) + loss) / n;
        }

        self.rsi = relative_strength(self.avg_gain, self.avg_loss);
        self.rsi
    }

    fn is_ready(&self) -> bool {
        self.count > self.period
    }

    fn validate(&self) -> Result<()> {
        check_period("period", self.period)?;
        if self.count > self.period + 1 {
            return Err(TaError::invalid_state(
                Self::NAME,
                format!("count {} exceeds period + 1", self.count),
            ));
        }
        if self.avg_gain < 0.0 || self.avg_loss < 0.0 {
            return Err(TaError::invalid_state(
                Self::NAME,
                "average gain and loss must be non-negative",
            ));
        }
        Ok(())
    }
}

impl Resettable for RsiState {
    fn reset(&mut self) {
        self.rsi = Float::NAN;
        self.prev_value = Float::NAN;
        self.avg_gain = 0.0;
        self.avg_loss = 0.0;
        self.count = 0;
    }
}

/// Computes the RSI of `data`.
///
/// ```rust
/// use tastate_core::momentum::rsi;
///
/// let result = rsi(&[1.0, 2.0, 3.0, 2.0], 2).unwrap();
/// assert_eq!(result.values[2], 100.0);
/// assert_eq!(result.values[3], 50.0);
/// ```
pub fn rsi(data: &[Float], period: usize) -> Result<RsiResult> {
    let mut values = vec![Float::NAN; data.len()];
    let state = rsi_into(data, period, &mut values)?;
    Ok(RsiResult { values, state })
}

/// Computes the RSI of `data` into `output`.
pub fn rsi_into(data: &[Float], period: usize, output: &mut [Float]) -> Result<RsiState> {
    check_output("output", output, data.len())?;
    let state = RsiState::new(period)?;
    Ok(driver::batch_into(state, data.iter().copied(), |i, v| {
        output[i] = v
    }))
}

/// Advances `state` by one sample.
pub fn rsi_next(sample: Float, state: &RsiState) -> Result<Next<RsiState>> {
    driver::next(sample, state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_bounds() {
        let data: Vec<Float> = (0..200).map(|i| 50.0 + (i as Float * 0.37).sin() * 10.0).collect();
        let result = rsi(&data, 14).unwrap();
        assert!(result.values[..14].iter().all(|v| v.is_nan()));
        assert!(result.values[14..].iter().all(|&v| (0.0..=100.0).contains(&v)));
    }

    #[test]
    fn test_rsi_flat_series_is_neutral() {
        let result = rsi(&[4.0; 10], 3).unwrap();
        assert!(result.values[3..].iter().all(|&v| v == 50.0));
    }

    #[test]
    fn test_rsi_only_losses_is_zero() {
        let data: Vec<Float> = (0..10).map(|i| -(i as Float)).collect();
        let result = rsi(&data, 3).unwrap();
        assert!(result.values[3..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rsi_wilder_smoothing() {
        let data = [1.0, 2.0, 1.0, 3.0];
        let result = rsi(&data, 2).unwrap();
        // seed: gains (1, 0), losses (0, 1) -> 0.5 / 0.5
        assert_eq!(result.values[2], 50.0);
        // change +2: gain = (0.5 + 2) / 2, loss = 0.5 / 2
        let (g, l) = (1.25, 0.25);
        assert!((result.values[3] - (100.0 - 100.0 / (1.0 + g / l))).abs() < 1e-12);
        assert_eq!(result.state.avg_gain, g);
        assert_eq!(result.state.avg_loss, l);
    }

    #[test]
    fn test_rsi_nan_is_sticky() {
        let result = rsi(&[1.0, 2.0, Float::NAN, 3.0, 4.0, 5.0], 2).unwrap();
        assert!(result.values.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_rsi_short_input_resumes() {
        let head = rsi(&[1.0, 2.0], 3).unwrap();
        assert!(!head.state.is_ready());
        assert_eq!(head.state.count, 2);
        let a = rsi_next(1.5, &head.state).unwrap();
        let b = rsi_next(2.5, &a.state).unwrap();
        assert!(a.value.is_nan());
        assert!(b.value.is_finite());
        let full = rsi(&[1.0, 2.0, 1.5, 2.5], 3).unwrap();
        assert_eq!(b.state, full.state);
    }

    #[test]
    fn test_rsi_validate() {
        let mut state = RsiState::new(3).unwrap();
        state.count = 9;
        assert!(rsi_next(1.0, &state).is_err());
    }
}
