//! SMA-seeded exponential smoothing.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{check_alpha, check_period, Result, TaError};
use crate::types::Float;

/// Smoothing factor for a period: `smoothing / (period + 1)`.
///
/// With the conventional `smoothing = 2.0` this is the usual EMA factor.
///
/// ```rust
/// use tastate_core::accumulators::period_to_alpha;
///
/// assert_eq!(period_to_alpha(3, None), 0.5);
/// assert_eq!(period_to_alpha(9, Some(1.0)), 0.1);
/// ```
#[inline]
pub fn period_to_alpha(period: usize, smoothing: Option<Float>) -> Float {
    smoothing.unwrap_or(2.0) / (period as Float + 1.0)
}

/// Exponentially smoothed value seeded with the mean of the first `period`
/// samples.
///
/// Until `period` samples were pushed the value reads NaN; the push that
/// completes the seed returns the mean, and every later push applies
/// `value += alpha * (sample - value)`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExponentialAccumulator {
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    alpha: Float,
    period: usize,
    seen: usize,
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    seed_sum: Float,
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    value: Float,
}

impl_nan_eq!(ExponentialAccumulator { floats: [alpha, seed_sum, value], fields: [period, seen] });

impl ExponentialAccumulator {
    /// Creates an accumulator, deriving alpha from the period when none is given.
    pub fn new(period: usize, alpha: Option<Float>) -> Result<Self> {
        check_period("period", period)?;
        let alpha = alpha.unwrap_or_else(|| period_to_alpha(period, None));
        check_alpha(alpha)?;
        Ok(Self {
            alpha,
            period,
            seen: 0,
            seed_sum: 0.0,
            value: Float::NAN,
        })
    }

    /// Feeds one sample and returns the current value.
    #[inline]
    pub fn push(&mut self, sample: Float) -> Float {
        if self.seen < self.period {
            self.seed_sum += sample;
            self.seen += 1;
            if self.seen == self.period {
                self.value = self.seed_sum / self.period as Float;
            }
        } else {
            self.value += self.alpha * (sample - self.value);
        }
        self.value
    }

    /// Current value, NaN until seeded.
    #[inline]
    pub fn value(&self) -> Float {
        self.value
    }

    /// Whether the seed average has been taken.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.seen >= self.period
    }

    /// Smoothing factor.
    #[inline]
    pub fn alpha(&self) -> Float {
        self.alpha
    }

    /// Seed length.
    #[inline]
    pub fn period(&self) -> usize {
        self.period
    }

    /// Forgets every sample, keeping period and alpha.
    pub fn reset(&mut self) {
        self.seen = 0;
        self.seed_sum = 0.0;
        self.value = Float::NAN;
    }

    /// Checks that the accumulator is internally consistent.
    pub fn validate(&self, indicator: &'static str) -> Result<()> {
        if self.period == 0 {
            return Err(TaError::invalid_state(indicator, "smoothing period is zero"));
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(TaError::invalid_state(
                indicator,
                format!("alpha {} is outside (0, 1]", self.alpha),
            ));
        }
        if self.seen > self.period {
            return Err(TaError::invalid_state(
                indicator,
                format!("seed count {} exceeds period {}", self.seen, self.period),
            ));
        }
        Ok(())
    }
}

/// Feeds `sample` through a chain of accumulators and returns the last
/// stage's value.
///
/// Stage `k + 1` receives the output of stage `k` only once stage `k` is
/// seeded, so an `n`-stage chain of period `p` first produces a value after
/// `n * (p - 1) + 1` samples. Intermediate values stay readable on the stages.
#[inline]
pub fn cascade_push(stages: &mut [ExponentialAccumulator], sample: Float) -> Float {
    let mut input = sample;
    for stage in stages.iter_mut() {
        let out = stage.push(input);
        if !stage.is_ready() {
            return Float::NAN;
        }
        input = out;
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_with_mean() {
        let mut acc = ExponentialAccumulator::new(3, None).unwrap();
        assert!(acc.push(1.0).is_nan());
        assert!(acc.push(2.0).is_nan());
        assert!(!acc.is_ready());
        assert_eq!(acc.push(3.0), 2.0);
        assert!(acc.is_ready());
        // alpha = 0.5
        assert_eq!(acc.push(4.0), 3.0);
    }

    #[test]
    fn test_custom_alpha() {
        let mut acc = ExponentialAccumulator::new(1, Some(0.25)).unwrap();
        assert_eq!(acc.push(8.0), 8.0);
        assert_eq!(acc.push(0.0), 6.0);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(matches!(
            ExponentialAccumulator::new(0, None),
            Err(TaError::InvalidPeriod { .. })
        ));
        assert!(matches!(
            ExponentialAccumulator::new(3, Some(0.0)),
            Err(TaError::InvalidParameter { .. })
        ));
        assert!(ExponentialAccumulator::new(3, Some(1.5)).is_err());
    }

    #[test]
    fn test_cascade_waits_for_each_stage() {
        let mut stages = vec![
            ExponentialAccumulator::new(2, None).unwrap(),
            ExponentialAccumulator::new(2, None).unwrap(),
        ];
        assert!(cascade_push(&mut stages, 1.0).is_nan());
        assert!(cascade_push(&mut stages, 3.0).is_nan());
        assert!(stages[0].is_ready());
        assert!(!stages[1].is_ready());
        // e1 = 2.0, then 2.0 + (5 - 2) * 2/3 = 4.0; e2 = mean(2, 4)
        assert!((cascade_push(&mut stages, 5.0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_reset_keeps_parameters() {
        let mut acc = ExponentialAccumulator::new(2, Some(0.3)).unwrap();
        acc.push(1.0);
        acc.push(1.0);
        acc.reset();
        assert!(!acc.is_ready());
        assert!(acc.value().is_nan());
        assert_eq!(acc.alpha(), 0.3);
        assert_eq!(acc.period(), 2);
    }

    #[test]
    fn test_nan_seed_sticks() {
        let mut acc = ExponentialAccumulator::new(2, None).unwrap();
        acc.push(Float::NAN);
        acc.push(1.0);
        assert!(acc.push(1.0).is_nan());
    }
}
