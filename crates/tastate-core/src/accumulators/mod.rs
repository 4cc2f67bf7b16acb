//! Shared accumulators that the indicator kernels are built from
//!
//! - [`SlidingWindow`]: last `N` samples with running sum and sum of squares
//! - [`ExponentialAccumulator`]: SMA-seeded exponential smoothing, chainable
//!   with [`cascade_push`]
//! - [`RollingMinMax`]: monotonic-deque rolling maximum and minimum
//!
//! Every accumulator is a plain owned value, so a kernel state that embeds them
//! can be cloned, compared and (with the `serde` feature) serialised.

pub mod exponential;
pub mod extrema;
pub mod window;

pub use exponential::{cascade_push, period_to_alpha, ExponentialAccumulator};
pub use extrema::RollingMinMax;
pub use window::SlidingWindow;
