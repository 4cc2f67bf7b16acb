//! Fixed-capacity sliding window with O(1) running aggregates.

use std::collections::VecDeque;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaError};
use crate::simd;
use crate::types::{same_float, Float};

/// The last `capacity` samples plus their running sum and sum of squares.
///
/// Aggregates are updated on every [`push`](Self::push) by subtracting the
/// evicted sample and adding the new one. Non-finite samples are counted
/// instead of summed: while one is inside the window [`sum`](Self::sum) and
/// [`sum_sq`](Self::sum_sq) read NaN, and once the last one is evicted both
/// aggregates are rebuilt from the buffer.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlidingWindow {
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable::deque"))]
    buffer: VecDeque<Float>,
    capacity: usize,
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    sum: Float,
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    sum_sq: Float,
    non_finite: usize,
}

impl PartialEq for SlidingWindow {
    fn eq(&self, other: &Self) -> bool {
        self.capacity == other.capacity
            && self.non_finite == other.non_finite
            && same_float(self.sum, other.sum)
            && same_float(self.sum_sq, other.sum_sq)
            && self.buffer.len() == other.buffer.len()
            && self
                .buffer
                .iter()
                .zip(&other.buffer)
                .all(|(a, b)| same_float(*a, *b))
    }
}

impl SlidingWindow {
    /// Creates an empty window. `capacity` must be non-zero; kernels check
    /// their periods before building windows.
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "window capacity must be non-zero");
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            sum: 0.0,
            sum_sq: 0.0,
            non_finite: 0,
        }
    }

    /// Pushes a sample and returns the one it evicted, if the window was full.
    #[inline]
    pub fn push(&mut self, sample: Float) -> Option<Float> {
        let evicted = if self.buffer.len() == self.capacity {
            self.buffer.pop_front()
        } else {
            None
        };

        let mut cleared = false;
        if let Some(old) = evicted {
            if old.is_finite() {
                self.sum -= old;
                self.sum_sq -= old * old;
            } else {
                self.non_finite -= 1;
                cleared = self.non_finite == 0;
            }
        }

        self.buffer.push_back(sample);
        if sample.is_finite() {
            self.sum += sample;
            self.sum_sq += sample * sample;
        } else {
            self.non_finite += 1;
        }

        if cleared && self.non_finite == 0 {
            self.rebuild();
        }
        evicted
    }

    /// Recomputes both aggregates from the buffer.
    pub fn rebuild(&mut self) {
        let data = self.buffer.make_contiguous();
        let (sum, sum_sq, non_finite) = if data.iter().all(|x| x.is_finite()) {
            (simd::sum(data), simd::sum_of_squares(data), 0)
        } else {
            let mut acc = (0.0, 0.0, 0);
            for &x in data.iter() {
                if x.is_finite() {
                    acc.0 += x;
                    acc.1 += x * x;
                } else {
                    acc.2 += 1;
                }
            }
            acc
        };
        tracing::trace!(len = data.len(), non_finite, "window aggregates rebuilt");
        self.sum = sum;
        self.sum_sq = sum_sq;
        self.non_finite = non_finite;
    }

    /// Sum of the samples in the window, NaN while a non-finite sample is inside.
    #[inline]
    pub fn sum(&self) -> Float {
        if self.non_finite > 0 {
            Float::NAN
        } else {
            self.sum
        }
    }

    /// Sum of squared samples, NaN while a non-finite sample is inside.
    #[inline]
    pub fn sum_sq(&self) -> Float {
        if self.non_finite > 0 {
            Float::NAN
        } else {
            self.sum_sq
        }
    }

    /// Arithmetic mean of the samples currently held.
    #[inline]
    pub fn mean(&self) -> Float {
        if self.buffer.is_empty() {
            return Float::NAN;
        }
        self.sum() / self.buffer.len() as Float
    }

    /// Number of samples held.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether no sample was pushed yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Maximum number of samples held.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the window holds `capacity` samples.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.buffer.len() == self.capacity
    }

    /// Whether a non-finite sample is inside the window.
    #[inline]
    pub fn has_non_finite(&self) -> bool {
        self.non_finite > 0
    }

    /// Oldest sample.
    #[inline]
    pub fn front(&self) -> Option<Float> {
        self.buffer.front().copied()
    }

    /// Newest sample.
    #[inline]
    pub fn back(&self) -> Option<Float> {
        self.buffer.back().copied()
    }

    /// Samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = Float> + '_ {
        self.buffer.iter().copied()
    }

    /// The buffer as one slice, oldest first.
    ///
    /// Moves the samples into a single run, so reductions over the result do
    /// not depend on where the ring buffer happened to wrap.
    pub fn make_contiguous(&mut self) -> &[Float] {
        self.buffer.make_contiguous()
    }

    /// Empties the window, keeping its capacity.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.sum = 0.0;
        self.sum_sq = 0.0;
        self.non_finite = 0;
    }

    /// Checks that the window is internally consistent.
    pub fn validate(&self, indicator: &'static str) -> Result<()> {
        if self.capacity == 0 {
            return Err(TaError::invalid_state(indicator, "window capacity is zero"));
        }
        if self.buffer.len() > self.capacity {
            return Err(TaError::invalid_state(
                indicator,
                format!(
                    "window holds {} samples, capacity is {}",
                    self.buffer.len(),
                    self.capacity
                ),
            ));
        }
        let counted = self.buffer.iter().filter(|x| !x.is_finite()).count();
        if counted != self.non_finite {
            return Err(TaError::invalid_state(
                indicator,
                format!(
                    "window tracks {} non-finite samples, buffer holds {counted}",
                    self.non_finite
                ),
            ));
        }
        Ok(())
    }
}
