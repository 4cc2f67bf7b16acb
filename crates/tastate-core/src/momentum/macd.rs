//! Moving Average Convergence/Divergence (MACD)
//!
//! `macd = ema(fast) - ema(slow)`, `signal = ema(macd, signal_period)`,
//! `histogram = macd - signal`.
//!
//! The fast EMA starts at sample `slow - fast` so that both EMAs are seeded at
//! index `slow - 1`. All three outputs are NaN until the signal line is seeded,
//! at index `(slow - 1) + (signal - 1)`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::accumulators::ExponentialAccumulator;
use crate::driver::{self, check_output, Next};
use crate::error::{check_period, Result, TaError};
use crate::traits::{Indicator, Resettable};
use crate::types::Float;

/// One MACD output.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MacdOutput {
    /// Fast EMA minus slow EMA
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub macd: Float,
    /// EMA of `macd`
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub signal: Float,
    /// `macd - signal`
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub histogram: Float,
}

impl MacdOutput {
    const UNDEFINED: Self = Self {
        macd: Float::NAN,
        signal: Float::NAN,
        histogram: Float::NAN,
    };
}

/// MACD batch result.
#[derive(Debug, Clone)]
pub struct MacdResult {
    /// MACD line
    pub macd: Vec<Float>,
    /// Signal line
    pub signal: Vec<Float>,
    /// Histogram
    pub histogram: Vec<Float>,
    /// State to continue from with [`macd_next`]
    pub state: MacdState,
}

/// MACD calculation state
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MacdState {
    /// Last MACD line value
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub macd: Float,
    /// Last signal value
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub signal: Float,
    /// Last histogram value
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub histogram: Float,
    /// Fast EMA
    pub fast_ema: ExponentialAccumulator,
    /// Slow EMA
    pub slow_ema: ExponentialAccumulator,
    /// EMA of the MACD line
    pub signal_ema: ExponentialAccumulator,
    /// Samples seen, saturating at `slow_period`
    pub count: usize,
    /// Fast EMA period
    pub fast_period: usize,
    /// Slow EMA period
    pub slow_period: usize,
    /// Signal EMA period
    pub signal_period: usize,
}

impl_nan_eq!(MacdState { floats: [macd, signal, histogram], fields: [fast_ema, slow_ema, signal_ema, count, fast_period, slow_period, signal_period] });

fn check_periods(fast: usize, slow: usize, signal: usize) -> Result<()> {
    check_period("fast_period", fast)?;
    check_period("slow_period", slow)?;
    check_period("signal_period", signal)?;
    if fast >= slow {
        return Err(TaError::invalid_parameter(
            "fast_period",
            fast,
            format!("less than slow_period ({slow})"),
        ));
    }
    Ok(())
}

impl MacdState {
    /// Creates a warming-up state.
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Result<Self> {
        check_periods(fast_period, slow_period, signal_period)?;
        Ok(Self {
            macd: Float::NAN,
            signal: Float::NAN,
            histogram: Float::NAN,
            fast_ema: ExponentialAccumulator::new(fast_period, None)?,
            slow_ema: ExponentialAccumulator::new(slow_period, None)?,
            signal_ema: ExponentialAccumulator::new(signal_period, None)?,
            count: 0,
            fast_period,
            slow_period,
            signal_period,
        })
    }

    fn output(&self) -> MacdOutput {
        MacdOutput {
            macd: self.macd,
            signal: self.signal,
            histogram: self.histogram,
        }
    }
}

impl Indicator for MacdState {
    type Input = Float;
    type Output = MacdOutput;
    const NAME: &'static str = "MACD";

    fn lookback(&self) -> usize {
        (self.slow_period - 1) + (self.signal_period - 1)
    }

    #[inline]
    fn update(&mut self, sample: Float) -> MacdOutput {
        let slow = self.slow_ema.push(sample);
        if self.count >= self.slow_period - self.fast_period {
            self.fast_ema.push(sample);
        }
        self.count = (self.count + 1).min(self.slow_period);

        if !self.slow_ema.is_ready() {
            return MacdOutput::UNDEFINED;
        }

        let line = self.fast_ema.value() - slow;
        let signal = self.signal_ema.push(line);
        if !self.signal_ema.is_ready() {
            return MacdOutput::UNDEFINED;
        }

        self.macd = line;
        self.signal = signal;
        self.histogram = line - signal;
        self.output()
    }

    fn is_ready(&self) -> bool {
        self.signal_ema.is_ready()
    }

    fn validate(&self) -> Result<()> {
        check_periods(self.fast_period, self.slow_period, self.signal_period)?;
        for (ema, period) in [
            (&self.fast_ema, self.fast_period),
            (&self.slow_ema, self.slow_period),
            (&self.signal_ema, self.signal_period),
        ] {
            ema.validate(Self::NAME)?;
            if ema.period() != period {
                return Err(TaError::invalid_state(
                    Self::NAME,
                    format!("EMA period {} does not match {period}", ema.period()),
                ));
            }
        }
        if self.count > self.slow_period {
            return Err(TaError::invalid_state(
                Self::NAME,
                format!("count {} exceeds slow_period", self.count),
            ));
        }
        Ok(())
    }
}

impl Resettable for MacdState {
    fn reset(&mut self) {
        self.macd = Float::NAN;
        self.signal = Float::NAN;
        self.histogram = Float::NAN;
        self.fast_ema.reset();
        self.slow_ema.reset();
        self.signal_ema.reset();
        self.count = 0;
    }
}

/// Computes the MACD of `data`.
pub fn macd(
    data: &[Float],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> Result<MacdResult> {
    let mut macd = vec![Float::NAN; data.len()];
    let mut signal = vec![Float::NAN; data.len()];
    let mut histogram = vec![Float::NAN; data.len()];
    let state = macd_into(
        data,
        fast_period,
        slow_period,
        signal_period,
        &mut macd,
        &mut signal,
        &mut histogram,
    )?;
    Ok(MacdResult {
        macd,
        signal,
        histogram,
        state,
    })
}

/// Computes the MACD into three caller-provided buffers.
pub fn macd_into(
    data: &[Float],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
    macd: &mut [Float],
    signal: &mut [Float],
    histogram: &mut [Float],
) -> Result<MacdState> {
    check_output("macd", macd, data.len())?;
    check_output("signal", signal, data.len())?;
    check_output("histogram", histogram, data.len())?;
    let state = MacdState::new(fast_period, slow_period, signal_period)?;
    Ok(driver::batch_into(state, data.iter().copied(), |i, out| {
        macd[i] = out.macd;
        signal[i] = out.signal;
        histogram[i] = out.histogram;
    }))
}

/// Advances `state` by one sample.
pub fn macd_next(sample: Float, state: &MacdState) -> Result<Next<MacdState, MacdOutput>> {
    driver::next(sample, state)
}
