//! Rolling maximum and minimum over a fixed number of samples.
//!
//! Both extremes are kept in monotonic deques of `(sequence, value)` pairs, so
//! each push is amortised O(1) regardless of the period.

use std::collections::VecDeque;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaError};
use crate::types::Float;

/// Rolling max of one stream and rolling min of another over the last
/// `period` pushes.
///
/// Feeding the same stream to both sides gives the rolling range of a single
/// series. Non-finite samples are not entered into the deques; the extremes
/// read NaN for as long as one is inside the window.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RollingMinMax {
    period: usize,
    seen: u64,
    max_deque: VecDeque<(u64, Float)>,
    min_deque: VecDeque<(u64, Float)>,
    last_non_finite: Option<u64>,
}

impl RollingMinMax {
    /// Creates an empty tracker; `period` must be non-zero.
    pub fn new(period: usize) -> Self {
        debug_assert!(period > 0, "extrema period must be non-zero");
        Self {
            period,
            seen: 0,
            max_deque: VecDeque::with_capacity(period),
            min_deque: VecDeque::with_capacity(period),
            last_non_finite: None,
        }
    }

    /// Pushes one `(max-side, min-side)` pair and returns the window's
    /// `(max, min)`, NaN while warming up or while a non-finite sample is inside.
    #[inline]
    pub fn push(&mut self, high: Float, low: Float) -> (Float, Float) {
        let seq = self.seen;
        self.seen += 1;

        if high.is_finite() {
            while self.max_deque.back().is_some_and(|&(_, v)| v <= high) {
                self.max_deque.pop_back();
            }
            self.max_deque.push_back((seq, high));
        } else {
            self.last_non_finite = Some(seq);
        }
        if low.is_finite() {
            while self.min_deque.back().is_some_and(|&(_, v)| v >= low) {
                self.min_deque.pop_back();
            }
            self.min_deque.push_back((seq, low));
        } else {
            self.last_non_finite = Some(seq);
        }

        let period = self.period as u64;
        while self.max_deque.front().is_some_and(|&(s, _)| s + period <= seq) {
            self.max_deque.pop_front();
        }
        while self.min_deque.front().is_some_and(|&(s, _)| s + period <= seq) {
            self.min_deque.pop_front();
        }

        self.extremes()
    }

    /// Current `(max, min)` of the window.
    pub fn extremes(&self) -> (Float, Float) {
        if !self.is_ready() || self.window_has_non_finite() {
            return (Float::NAN, Float::NAN);
        }
        match (self.max_deque.front(), self.min_deque.front()) {
            (Some(&(_, max)), Some(&(_, min))) => (max, min),
            _ => (Float::NAN, Float::NAN),
        }
    }

    fn window_has_non_finite(&self) -> bool {
        self.last_non_finite
            .is_some_and(|s| s + self.period as u64 >= self.seen)
    }

    /// Whether `period` samples were pushed.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.seen >= self.period as u64
    }

    /// Window length.
    #[inline]
    pub fn period(&self) -> usize {
        self.period
    }

    /// Forgets every sample, keeping the period.
    pub fn clear(&mut self) {
        self.seen = 0;
        self.max_deque.clear();
        self.min_deque.clear();
        self.last_non_finite = None;
    }

    /// Checks that the tracker is internally consistent.
    pub fn validate(&self, indicator: &'static str) -> Result<()> {
        if self.period == 0 {
            return Err(TaError::invalid_state(indicator, "extrema period is zero"));
        }
        if self.max_deque.len() > self.period || self.min_deque.len() > self.period {
            return Err(TaError::invalid_state(
                indicator,
                format!("extrema deques exceed period {}", self.period),
            ));
        }
        let stale = |d: &VecDeque<(u64, Float)>| {
            d.iter()
                .any(|&(s, _)| s >= self.seen || s + self.period as u64 <= self.seen.saturating_sub(1))
        };
        if stale(&self.max_deque) || stale(&self.min_deque) {
            return Err(TaError::invalid_state(
                indicator,
                "extrema deque holds samples outside the window",
            ));
        }
        Ok(())
    }
}
