//! Triangular Moving Average (TRIMA)
//!
//! An SMA of an SMA. For an odd period `N` both stages have length
//! `(N + 1) / 2`; for an even period the inner stage has `N / 2 + 1` samples
//! and the outer one `N / 2`. Either way the first value is at index `N - 1`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::accumulators::SlidingWindow;
use crate::driver::{self, check_output, Next};
use crate::error::{check_period, Result, TaError};
use crate::traits::{Indicator, Resettable};
use crate::types::Float;

/// TRIMA batch result.
#[derive(Debug, Clone)]
pub struct TrimaResult {
    /// TRIMA values, NaN for the first `period - 1` positions
    pub values: Vec<Float>,
    /// State to continue from with [`trima_next`]
    pub state: TrimaState,
}

/// TRIMA calculation state
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrimaState {
    /// Last TRIMA value
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub trima: Float,
    /// Raw samples averaged by the first stage
    pub inner: SlidingWindow,
    /// First-stage averages averaged by the second stage
    pub outer: SlidingWindow,
    /// Overall period
    pub period: usize,
}

impl_nan_eq!(TrimaState { floats: [trima], fields: [inner, outer, period] });

/// Stage lengths `(inner, outer)` for a TRIMA period.
///
/// ```rust
/// use tastate_core::overlap::trima_stage_lengths;
///
/// assert_eq!(trima_stage_lengths(5), (3, 3));
/// assert_eq!(trima_stage_lengths(6), (4, 3));
/// ```
pub fn trima_stage_lengths(period: usize) -> (usize, usize) {
    if period % 2 == 1 {
        let n = (period + 1) / 2;
        (n, n)
    } else {
        (period / 2 + 1, period / 2)
    }
}

impl TrimaState {
    /// Creates a warming-up state.
    pub fn new(period: usize) -> Result<Self> {
        check_period("period", period)?;
        let (n1, n2) = trima_stage_lengths(period);
        Ok(Self {
            trima: Float::NAN,
            inner: SlidingWindow::new(n1),
            outer: SlidingWindow::new(n2),
            period,
        })
    }
}

impl Indicator for TrimaState {
    type Input = Float;
    type Output = Float;
    const NAME: &'static str = "TRIMA";

    fn lookback(&self) -> usize {
        self.period - 1
    }

    #[inline]
    fn update(&mut self, sample: Float) -> Float {
        self.inner.push(sample);
        self.trima = Float::NAN;
        if self.inner.is_full() {
            let first = self.inner.sum() / self.inner.capacity() as Float;
            self.outer.push(first);
            if self.outer.is_full() {
                self.trima = self.outer.sum() / self.outer.capacity() as Float;
            }
        }
        self.trima
    }

    fn is_ready(&self) -> bool {
        self.outer.is_full()
    }

    fn validate(&self) -> Result<()> {
        check_period("period", self.period)?;
        self.inner.validate(Self::NAME)?;
        self.outer.validate(Self::NAME)?;
        let expected = trima_stage_lengths(self.period);
        if (self.inner.capacity(), self.outer.capacity()) != expected {
            return Err(TaError::invalid_state(
                Self::NAME,
                format!(
                    "stage lengths ({}, {}) do not match period {}",
                    self.inner.capacity(),
                    self.outer.capacity(),
                    self.period
                ),
            ));
        }
        if !self.inner.is_full() && !self.outer.is_empty() {
            return Err(TaError::invalid_state(
                Self::NAME,
                "outer stage filled before inner stage",
            ));
        }
        Ok(())
    }
}

impl Resettable for TrimaState {
    fn reset(&mut self) {
        self.trima = Float::NAN;
        self.inner.clear();
        self.outer.clear();
    }
}

/// Computes the TRIMA of `data`.
pub fn trima(data: &[Float], period: usize) -> Result<TrimaResult> {
    let mut values = vec![Float::NAN; data.len()];
    let state = trima_into(data, period, &mut values)?;
    Ok(TrimaResult { values, state })
}

/// Computes the TRIMA of `data` into `output`.
pub fn trima_into(data: &[Float], period: usize, output: &mut [Float]) -> Result<TrimaState> {
    check_output("output", output, data.len())?;
    let state = TrimaState::new(period)?;
    Ok(driver::batch_into(state, data.iter().copied(), |i, v| {
        output[i] = v
    }))
}

/// Advances `state` by one sample.
pub fn trima_next(sample: Float, state: &TrimaState) -> Result<Next<TrimaState>> {
    driver::next(sample, state)
}
