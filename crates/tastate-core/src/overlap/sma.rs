//! Simple Moving Average (SMA)
//!
//! Arithmetic mean of the last `period` samples. The first defined value is at
//! index `period - 1`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::accumulators::SlidingWindow;
use crate::driver::{self, check_output, Next};
use crate::error::{check_period, Result, TaError};
use crate::traits::{Indicator, Resettable};
use crate::types::Float;

/// SMA batch result: one value per input sample and the state after the last one.
#[derive(Debug, Clone)]
pub struct SmaResult {
    /// SMA values, NaN for the first `period - 1` positions
    pub values: Vec<Float>,
    /// State to continue from with [`sma_next`]
    pub state: SmaState,
}

/// SMA calculation state
///
/// **Last output**
/// - `sma`: the last SMA value (NaN while warming up)
///
/// **State values**
/// - `window`: the last `period` samples with their running sum
///
/// **Parameters**
/// - `period`: number of samples averaged
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SmaState {
    /// Last SMA value
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub sma: Float,
    /// Last `period` samples
    pub window: SlidingWindow,
    /// Averaging period
    pub period: usize,
}

impl_nan_eq!(SmaState { floats: [sma], fields: [window, period] });

impl SmaState {
    /// Creates a warming-up state.
    pub fn new(period: usize) -> Result<Self> {
        check_period("period", period)?;
        Ok(Self {
            sma: Float::NAN,
            window: SlidingWindow::new(period),
            period,
        })
    }
}

impl Indicator for SmaState {
    type Input = Float;
    type Output = Float;
    const NAME: &'static str = "SMA";

    fn lookback(&self) -> usize {
        self.period - 1
    }

    #[inline]
    fn update(&mut self, sample: Float) -> Float {
        self.window.push(sample);
        self.sma = if self.window.is_full() {
            self.window.sum() / self.period as Float
        } else {
            Float::NAN
        };
        self.sma
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

impl Resettable for SmaState {
    fn reset(&mut self) {
        self.sma = Float::NAN;
        self.window.clear();
    }
}

/// Computes the SMA of `data`.
///
/// ```rust
/// use tastate_core::overlap::sma;
///
/// let result = sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
/// assert!(result.values[1].is_nan());
/// assert_eq!(&result.values[2..], &[2.0, 3.0, 4.0]);
/// assert_eq!(result.state.sma, 4.0);
/// ```
pub fn sma(data: &[Float], period: usize) -> Result<SmaResult> {
    let mut values = vec![Float::NAN; data.len()];
    let state = sma_into(data, period, &mut values)?;
    Ok(SmaResult { values, state })
}

/// Computes the SMA of `data` into `output`, which must be as long as `data`.
pub fn sma_into(data: &[Float], period: usize, output: &mut [Float]) -> Result<SmaState> {
    check_output("output", output, data.len())?;
    let state = SmaState::new(period)?;
    Ok(driver::batch_into(state, data.iter().copied(), |i, v| {
        output[i] = v
    }))
}

/// Advances `state` by one sample.
pub fn sma_next(sample: Float, state: &SmaState) -> Result<Next<SmaState>> {
    driver::next(sample, state)
}
