//! Kaufman Adaptive Moving Average (KAMA)
//!
//! The smoothing constant follows the efficiency ratio of the last `period`
//! changes:
//!
//! ```text
//! er   = |x - x[-period]| / sum(|dx|)
//! sc   = (er * (fast - slow) + slow)^2      fast = 2/3, slow = 2/31
//! kama = kama + sc * (x - kama)
//! ```
//!
//! The running value is seeded with sample `period - 1`; the first output is
//! at index `period`. Two quirks of the reference algorithm are kept: the ratio
//! is forced to 1 when `sum(|dx|) <= x - x[-period]` (a signed comparison) or
//! when the denominator is zero.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::accumulators::SlidingWindow;
use crate::driver::{self, check_output, Next};
use crate::error::{check_period, Result, TaError};
use crate::traits::{Indicator, Resettable};
use crate::types::{Float, ZERO_EPSILON};

const FAST_SC: Float = 2.0 / (2.0 + 1.0);
const SLOW_SC: Float = 2.0 / (30.0 + 1.0);

/// KAMA batch result.
#[derive(Debug, Clone)]
pub struct KamaResult {
    /// KAMA values, NaN for the first `period` positions
    pub values: Vec<Float>,
    /// State to continue from with [`kama_next`]
    pub state: KamaState,
}

/// KAMA calculation state
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KamaState {
    /// Running KAMA; holds the seed sample until the first output
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub kama: Float,
    /// Last `period + 1` samples
    pub prices: SlidingWindow,
    /// Last `period` absolute one-step changes
    pub changes: SlidingWindow,
    /// Efficiency-ratio period
    pub period: usize,
}

impl_nan_eq!(KamaState { floats: [kama], fields: [prices, changes, period] });

impl KamaState {
    /// Creates a warming-up state.
    pub fn new(period: usize) -> Result<Self> {
        check_period("period", period)?;
        Ok(Self {
            kama: Float::NAN,
            prices: SlidingWindow::new(period + 1),
            changes: SlidingWindow::new(period),
            period,
        })
    }
}

impl Indicator for KamaState {
    type Input = Float;
    type Output = Float;
    const NAME: &'static str = "KAMA";

    fn lookback(&self) -> usize {
        self.period
    }

    #[inline]
    fn update(&mut self, sample: Float) -> Float {
        if let Some(prev) = self.prices.back() {
            self.changes.push((sample - prev).abs());
        }
        self.prices.push(sample);

        if !self.prices.is_full() {
            if self.prices.len() == self.period {
                self.kama = sample;
            }
            return Float::NAN;
        }

        let period_roc = self.prices.front().map_or(Float::NAN, |old| sample - old);
        let sum_roc1 = self.changes.sum();
        let er = if sum_roc1 <= period_roc || sum_roc1.abs() < ZERO_EPSILON {
            1.0
        } else {
            (period_roc / sum_roc1).abs()
        };
        let sc = er * (FAST_SC - SLOW_SC) + SLOW_SC;
        self.kama += (sample - self.kama) * sc * sc;
        self.kama
    }

    fn is_ready(&self) -> bool {
        self.prices.is_full()
    }

    fn validate(&self) -> Result<()> {
        check_period("period", self.period)?;
        self.prices.validate(Self::NAME)?;
        self.changes.validate(Self::NAME)?;
        if self.prices.capacity() != self.period + 1 || self.changes.capacity() != self.period {
            return Err(TaError::invalid_state(
                Self::NAME,
                format!("window capacities do not match period {}", self.period),
            ));
        }
        if self.changes.len() + 1 != self.prices.len() && !self.prices.is_empty() {
            return Err(TaError::invalid_state(
                Self::NAME,
                "change window is out of step with price window",
            ));
        }
        Ok(())
    }
}

impl Resettable for KamaState {
    fn reset(&mut self) {
        self.kama = Float::NAN;
        self.prices.clear();
        self.changes.clear();
    }
}

/// Computes the KAMA of `data`.
pub fn kama(data: &[Float], period: usize) -> Result<KamaResult> {
    let mut values = vec![Float::NAN; data.len()];
    let state = kama_into(data, period, &mut values)?;
    Ok(KamaResult { values, state })
}

/// Computes the KAMA of `data` into `output`.
pub fn kama_into(data: &[Float], period: usize, output: &mut [Float]) -> Result<KamaState> {
    check_output("output", output, data.len())?;
    let state = KamaState::new(period)?;
    Ok(driver::batch_into(state, data.iter().copied(), |i, v| {
        output[i] = v
    }))
}

/// Advances `state` by one sample.
pub fn kama_next(sample: Float, state: &KamaState) -> Result<Next<KamaState>> {
    driver::next(sample, state)
}
