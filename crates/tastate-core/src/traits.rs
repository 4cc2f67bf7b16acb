//! Core traits implemented by every indicator state
//!
//! ## NaN value semantics
//!
//! `Float::NAN` is used instead of `Option<Float>` for undefined outputs:
//!
//! - **Warm-up**: the first [`Indicator::lookback`] outputs of a series are NaN.
//! - **NaN input**: a NaN sample is accepted and propagates. Window-based
//!   indicators recover once it leaves the window; recursive ones stay NaN.
//!
//! Neither case is an error. Errors are reserved for parameters and misuse,
//! see [`TaError`](crate::error::TaError).
//!
//! ## One update, two drivers
//!
//! An indicator state *is* the kernel: [`Indicator::update`] advances it by one
//! sample. The batch driver calls it once per sample over a whole series; the
//! incremental driver clones a saved state and calls it once. Because both go
//! through the same method, resuming from a saved state is bit-for-bit
//! identical to having processed the whole series in one batch.

use crate::error::Result;

/// A resumable indicator state.
///
/// Implementors are plain owned values holding just the statistics needed to
/// continue: last outputs, accumulators and the parameters they were built
/// with.
///
/// # Example
///
/// ```rust
/// use tastate_core::overlap::SmaState;
/// use tastate_core::traits::Indicator;
///
/// let mut sma = SmaState::new(3).unwrap();
/// assert_eq!(sma.lookback(), 2);
///
/// assert!(sma.update(1.0).is_nan());
/// assert!(sma.update(2.0).is_nan());
/// assert!(!sma.is_ready());
///
/// assert_eq!(sma.update(3.0), 2.0);
/// assert!(sma.is_ready());
/// ```
pub trait Indicator: Clone {
    /// One sample: `Float` for most indicators, [`HighLow`](crate::types::HighLow)
    /// for range indicators.
    type Input: Copy;

    /// One output: `Float`, or a named struct for multi-output indicators.
    type Output: Copy;

    /// Short upper-case name used in logs and errors.
    const NAME: &'static str;

    /// Number of leading samples whose output is undefined (NaN).
    fn lookback(&self) -> usize;

    /// Advances the state by one sample and returns the output for it.
    fn update(&mut self, input: Self::Input) -> Self::Output;

    /// Whether the warm-up is over, i.e. the last update produced a defined
    /// value for finite input.
    fn is_ready(&self) -> bool;

    /// Checks that the state's internals agree with its parameters.
    ///
    /// States built through their constructors always pass; this guards the
    /// incremental driver against hand-edited or deserialised states.
    fn validate(&self) -> Result<()>;
}

/// Resets a state to its initial warm-up condition, keeping its parameters.
///
/// ```rust
/// use tastate_core::momentum::RsiState;
/// use tastate_core::traits::{Indicator, Resettable};
///
/// let mut rsi = RsiState::new(2).unwrap();
/// for x in [1.0, 2.0, 3.0] {
///     rsi.update(x);
/// }
/// assert!(rsi.is_ready());
///
/// rsi.reset();
/// assert!(!rsi.is_ready());
/// assert_eq!(rsi.period, 2);
/// ```
pub trait Resettable {
    /// Reset the indicator to its initial state.
    fn reset(&mut self);
}
