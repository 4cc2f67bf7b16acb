//! Rate of Change (ROC)
//!
//! `(x / x[-period] - 1) * 100`, defined as 0 when the lagged sample is 0.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::accumulators::SlidingWindow;
use crate::driver::{self, check_output, Next};
use crate::error::{check_period, Result, TaError};
use crate::traits::{Indicator, Resettable};
use crate::types::Float;

/// ROC batch result.
#[derive(Debug, Clone)]
pub struct RocResult {
    /// ROC values in percent, NaN for the first `period` positions
    pub values: Vec<Float>,
    /// State to continue from with [`roc_next`]
    pub state: RocState,
}

/// ROC calculation state
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RocState {
    /// Last ROC value
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub roc: Float,
    /// Last `period + 1` samples; the oldest is the lagged reference
    pub lag: SlidingWindow,
    /// Lag length
    pub period: usize,
}

impl_nan_eq!(RocState { floats: [roc], fields: [lag, period] });

impl RocState {
    /// Creates a warming-up state.
    pub fn new(period: usize) -> Result<Self> {
        check_period("period", period)?;
        Ok(Self {
            roc: Float::NAN,
            lag: SlidingWindow::new(period + 1),
            period,
        })
    }
}

impl Indicator for RocState {
    type Input = Float;
    type Output = Float;
    const NAME: &'static str = "ROC";

    fn lookback(&self) -> usize {
        self.period
    }

    #[inline]
    fn update(&mut self, sample: Float) -> Float {
        self.lag.push(sample);
        self.roc = match self.lag.front() {
            Some(prev) if self.lag.is_full() => {
                if prev == 0.0 {
                    0.0
                } else {
                    (sample / prev - 1.0) * 100.0
                }
            }
            _ => Float::NAN,
        };
        self.roc
    }

    fn is_ready(&self) -> bool {
        self.lag.is_full()
    }

    fn validate(&self) -> Result<()> {
        check_period("period", self.period)?;
        self.lag.validate(Self::NAME)?;
        if self.lag.capacity() != self.period + 1 {
            return Err(TaError::invalid_state(
                Self::NAME,
                format!(
                    "lag window holds {} samples, expected {}",
                    self.lag.capacity(),
                    self.period + 1
                ),
            ));
        }
        Ok(())
    }
}

impl Resettable for RocState {
    fn reset(&mut self) {
        self.roc = Float::NAN;
        self.lag.clear();
    }
}

/// Computes the ROC of `data`.
///
/// ```rust
/// use tastate_core::momentum::roc;
///
/// let result = roc(&[10.0, 11.0, 12.0], 2).unwrap();
/// assert!(result.values[1].is_nan());
/// assert!((result.values[2] - 20.0).abs() < 1e-12);
/// ```
pub fn roc(data: &[Float], period: usize) -> Result<RocResult> {
    let mut values = vec![Float::NAN; data.len()];
    let state = roc_into(data, period, &mut values)?;
    Ok(RocResult { values, state })
}

/// Computes the ROC of `data` into `output`.
pub fn roc_into(data: &[Float], period: usize, output: &mut [Float]) -> Result<RocState> {
    check_output("output", output, data.len())?;
    let state = RocState::new(period)?;
    Ok(driver::batch_into(state, data.iter().copied(), |i, v| {
        output[i] = v
    }))
}

/// Advances `state` by one sample.
pub fn roc_next(sample: Float, state: &RocState) -> Result<Next<RocState>> {
    driver::next(sample, state)
}
