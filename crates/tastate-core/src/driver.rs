//! Batch and incremental drivers
//!
//! Both drivers are generic over [`Indicator`] and contain no per-indicator
//! logic. The per-indicator `xxx`, `xxx_into` and `xxx_next` functions are thin
//! wrappers around them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaError};
use crate::traits::Indicator;
use crate::types::Float;

/// Output of one incremental step: the value for the new sample and the state
/// after it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Next<S, O = Float> {
    /// Output for the sample just processed
    pub value: O,
    /// State to pass to the next call
    pub state: S,
}

/// Feeds `inputs` through `state` in order, handing each output to `sink`
/// together with its index, and returns the final state.
pub fn batch_into<S, I, F>(mut state: S, inputs: I, mut sink: F) -> S
where
    S: Indicator,
    I: IntoIterator<Item = S::Input>,
    F: FnMut(usize, S::Output),
{
    let lookback = state.lookback();
    let mut len = 0;
    for (i, input) in inputs.into_iter().enumerate() {
        sink(i, state.update(input));
        len = i + 1;
    }
    tracing::debug!(
        indicator = S::NAME,
        len,
        lookback,
        ready = state.is_ready(),
        "batch finished"
    );
    state
}

/// Runs a fresh state over a whole series and collects the outputs.
pub fn batch<S: Indicator>(state: S, inputs: &[S::Input]) -> (Vec<S::Output>, S) {
    let mut values = Vec::with_capacity(inputs.len());
    let state = batch_into(state, inputs.iter().copied(), |_, v| values.push(v));
    (values, state)
}

/// Continues a previously produced state over more samples.
///
/// Equivalent to calling [`next`] once per sample, without the intermediate
/// clones.
pub fn resume<S: Indicator>(state: &S, inputs: &[S::Input]) -> Result<(Vec<S::Output>, S)> {
    state.validate()?;
    Ok(batch(state.clone(), inputs))
}

/// Advances a saved state by one sample without touching the caller's copy.
///
/// ```rust
/// use tastate_core::driver;
/// use tastate_core::overlap::sma;
///
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let head = sma(&data[..4], 3).unwrap();
/// let step = driver::next(data[4], &head.state).unwrap();
///
/// let full = sma(&data, 3).unwrap();
/// assert_eq!(step.value, full.values[4]);
/// assert_eq!(step.state, full.state);
/// ```
pub fn next<S: Indicator>(sample: S::Input, state: &S) -> Result<Next<S, S::Output>> {
    state.validate()?;
    let mut state = state.clone();
    let value = state.update(sample);
    Ok(Next { value, state })
}

/// Rejects an output buffer that is not exactly as long as the input.
pub(crate) fn check_output(what: &str, output: &[Float], len: usize) -> Result<()> {
    if output.len() != len {
        return Err(TaError::length_mismatch(what, len, output.len()));
    }
    Ok(())
}
