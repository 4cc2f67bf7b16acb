//! Midpoint price over a period (MIDPRICE)
//!
//! `(highest high + lowest low) / 2` over the last `period` bars.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::accumulators::RollingMinMax;
use crate::driver::{self, check_output, Next};
use crate::error::{check_period, Result, TaError};
use crate::traits::{Indicator, Resettable};
use crate::types::{Float, HighLow};

/// MIDPRICE batch result.
#[derive(Debug, Clone)]
pub struct MidpriceResult {
    /// MIDPRICE values, NaN for the first `period - 1` positions
    pub values: Vec<Float>,
    /// State to continue from with [`midprice_next`]
    pub state: MidpriceState,
}

/// MIDPRICE calculation state
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MidpriceState {
    /// Last MIDPRICE value
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub midprice: Float,
    /// Rolling max of highs and min of lows
    pub extremes: RollingMinMax,
    /// Window length
    pub period: usize,
}

impl_nan_eq!(MidpriceState { floats: [midprice], fields: [extremes, period] });

impl MidpriceState {
    /// Creates a warming-up state.
    pub fn new(period: usize) -> Result<Self> {
        check_period("period", period)?;
        Ok(Self {
            midprice: Float::NAN,
            extremes: RollingMinMax::new(period),
            period,
        })
    }
}

impl Indicator for MidpriceState {
    type Input = HighLow;
    type Output = Float;
    const NAME: &'static str = "MIDPRICE";

    fn lookback(&self) -> usize {
        self.period - 1
    }

    #[inline]
    fn update(&mut self, bar: HighLow) -> Float {
        let (max, min) = self.extremes.push(bar.high, bar.low);
        self.midprice = (max + min) / 2.0;
        self.midprice
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

impl Resettable for MidpriceState {
    fn reset(&mut self) {
        self.midprice = Float::NAN;
        self.extremes.clear();
    }
}

/// Computes the MIDPRICE of aligned `high` and `low` series.
pub fn midprice(high: &[Float], low: &[Float], period: usize) -> Result<MidpriceResult> {
    let mut values = vec![Float::NAN; high.len()];
    let state = midprice_into(high, low, period, &mut values)?;
    Ok(MidpriceResult { values, state })
}

/// Computes the MIDPRICE into `output`; all three slices must have the same length.
pub fn midprice_into(
    high: &[Float],
    low: &[Float],
    period: usize,
    output: &mut [Float],
) -> Result<MidpriceState> {
    if high.len() != low.len() {
        return Err(TaError::length_mismatch("low", high.len(), low.len()));
    }
    check_output("output", output, high.len())?;
    let state = MidpriceState::new(period)?;
    let bars = high.iter().zip(low).map(|(&h, &l)| HighLow::new(h, l));
    Ok(driver::batch_into(state, bars, |i, v| output[i] = v))
}

/// Advances `state` by one `(high, low)` bar.
pub fn midprice_next(high: Float, low: Float, state: &MidpriceState) -> Result<Next<MidpriceState>> {
    driver::next(HighLow::new(high, low), state)
}
