//! Weighted Moving Average (WMA)
//!
//! Linearly weighted mean of the last `period` samples: the newest sample has
//! weight `period`, the oldest weight `1`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::accumulators::SlidingWindow;
use crate::driver::{self, check_output, Next};
use crate::error::{check_period, Result, TaError};
use crate::simd;
use crate::traits::{Indicator, Resettable};
use crate::types::Float;

/// WMA batch result.
#[derive(Debug, Clone)]
pub struct WmaResult {
    /// WMA values, NaN for the first `period - 1` positions
    pub values: Vec<Float>,
    /// State to continue from with [`wma_next`]
    pub state: WmaState,
}

/// WMA calculation state
///
/// The weighted sum is maintained with the recurrence
/// `weighted' = weighted - sum(window) + period * sample`, so no per-sample
/// dot product is needed.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WmaState {
    /// Last WMA value
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub wma: Float,
    /// Last `period` samples with their plain sum
    pub window: SlidingWindow,
    /// `sum(i * x_i)` over the window, weights starting at 1 for the oldest
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub weighted_sum: Float,
    /// Averaging period
    pub period: usize,
}

impl_nan_eq!(WmaState { floats: [wma, weighted_sum], fields: [window, period] });

impl WmaState {
    /// Creates a warming-up state.
    pub fn new(period: usize) -> Result<Self> {
        check_period("period", period)?;
        Ok(Self {
            wma: Float::NAN,
            window: SlidingWindow::new(period),
            weighted_sum: 0.0,
            period,
        })
    }

    #[inline]
    fn divider(&self) -> Float {
        (self.period * (self.period + 1)) as Float / 2.0
    }

    fn rebuild_weighted_sum(&mut self) {
        let samples = self.window.make_contiguous();
        let weights: Vec<Float> = (1..=samples.len()).map(|w| w as Float).collect();
        self.weighted_sum = simd::dot_product(samples, &weights);
    }
}

impl Indicator for WmaState {
    type Input = Float;
    type Output = Float;
    const NAME: &'static str = "WMA";

    fn lookback(&self) -> usize {
        self.period - 1
    }

    #[inline]
    fn update(&mut self, sample: Float) -> Float {
        let len_before = self.window.len();
        let sum_before = self.window.sum();
        let had_non_finite = self.window.has_non_finite();

        self.window.push(sample);

        if self.window.has_non_finite() {
            self.weighted_sum = Float::NAN;
        } else if had_non_finite || !self.weighted_sum.is_finite() {
            self.rebuild_weighted_sum();
        } else if len_before == self.period {
            self.weighted_sum += self.period as Float * sample - sum_before;
        } else {
            self.weighted_sum += (len_before + 1) as Float * sample;
        }

        self.wma = if self.window.is_full() {
            self.weighted_sum / self.divider()
        } else {
            Float::NAN
        };
        self.wma
    }

    fn is_ready(&self) -> bool {
        self.window.is_full()
    }

    fn validate(&self) -> Result<()> {
        check_period("period", self.period)?;
        self.window.validate(Self::NAME)?;
        if self.window.capacity() != self.period {
            return Err(TaError::invalid_state(
                Self::NAME,
                format!(
                    "window capacity {} does not match period {}",
                    self.window.capacity(),
                    self.period
                ),
            ));
        }
        Ok(())
    }
}

impl Resettable for WmaState {
    fn reset(&mut self) {
        self.wma = Float::NAN;
        self.window.clear();
        self.weighted_sum = 0.0;
    }
}

/// Computes the WMA of `data`.
///
/// ```rust
/// use tastate_core::overlap::wma;
///
/// // (1*1 + 2*2 + 3*3) / 6
/// let result = wma(&[1.0, 2.0, 3.0], 3).unwrap();
/// assert!((result.values[2] - 14.0 / 6.0).abs() < 1e-12);
/// ```
pub fn wma(data: &[Float], period: usize) -> Result<WmaResult> {
    let mut values = vec![Float::NAN; data.len()];
    let state = wma_into(data, period, &mut values)?;
    Ok(WmaResult { values, state })
}

/// Computes the WMA of `data` into `output`.
pub fn wma_into(data: &[Float], period: usize, output: &mut [Float]) -> Result<WmaState> {
    check_output("output", output, data.len())?;
    let state = WmaState::new(period)?;
    Ok(driver::batch_into(state, data.iter().copied(), |i, v| {
        output[i] = v
    }))
}

/// Advances `state` by one sample.
pub fn wma_next(sample: Float, state: &WmaState) -> Result<Next<WmaState>> {
    driver::next(sample, state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(data: &[Float], end: usize, period: usize) -> Float {
        let window = &data[end + 1 - period..=end];
        let num: Float = window
            .iter()
            .enumerate()
            .map(|(i, x)| (i + 1) as Float * x)
            .sum();
        num / (period * (period + 1)) as Float * 2.0
    }

    #[test]
    fn test_wma_matches_definition() {
        let data: Vec<Float> = (0..50).map(|i| 100.0 + (i as Float * 0.3).sin() * 5.0).collect();
        let result = wma(&data, 6).unwrap();
        for i in 0..5 {
            assert!(result.values[i].is_nan());
        }
        for i in 5..data.len() {
            assert!((result.values[i] - naive(&data, i, 6)).abs() < 1e-9, "index {i}");
        }
    }

    #[test]
    fn test_wma_nan_recovers() {
        let mut data: Vec<Float> = (0..20).map(|i| i as Float).collect();
        data[7] = Float::NAN;
        let result = wma(&data, 3).unwrap();
        for i in 7..10 {
            assert!(result.values[i].is_nan(), "index {i}");
        }
        assert!((result.values[10] - naive(&data, 10, 3)).abs() < 1e-12);
        assert!((result.values[19] - naive(&data, 19, 3)).abs() < 1e-12);
    }

    #[test]
    fn test_wma_next_continues_warm_up() {
        let head = wma(&[1.0, 2.0], 3).unwrap();
        assert!(!head.state.is_ready());
        let step = wma_next(3.0, &head.state).unwrap();
        assert!((step.value - 14.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_wma_zero_period_rejected() {
        assert!(wma(&[1.0, 2.0], 0).is_err());
    }
}
