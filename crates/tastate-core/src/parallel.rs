//! Data parallelism across independent series
//!
//! States share nothing, so running many series at once is a plain rayon map.
//! Each series is still processed sequentially by its own state.

use rayon::prelude::*;

use crate::config::IndicatorConfig;
use crate::error::{Result, TaError};
use crate::state::{IndicatorResult, IndicatorState, IndicatorValue, Sample, Series};

/// Runs one configuration over many series in parallel.
///
/// Results come back in the order of `series`. The first error, in series
/// order, is returned.
pub fn batch_many(config: &IndicatorConfig, series: &[Series<'_>]) -> Result<Vec<IndicatorResult>> {
    config.validate()?;
    tracing::debug!(indicator = config.name(), series = series.len(), "parallel batch");
    series.par_iter().map(|s| config.batch(*s)).collect()
}

/// Advances many independent states by one sample each.
pub fn next_many(
    states: &[IndicatorState],
    samples: &[Sample],
) -> Result<Vec<(IndicatorValue, IndicatorState)>> {
    if states.len() != samples.len() {
        return Err(TaError::length_mismatch("samples", states.len(), samples.len()));
    }
    states
        .par_iter()
        .zip(samples.par_iter())
        .map(|(state, sample)| state.next(*sample))
        .collect()
}
