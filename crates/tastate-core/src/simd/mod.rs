//! # SIMD reductions
//!
//! Window aggregates are maintained incrementally, but they have to be rebuilt
//! from the raw buffer when a window is first filled and after a non-finite
//! sample leaves it. Those rebuilds go through the reductions in this module.
//!
//! The implementation is chosen once, at first use, and cached in a dispatch
//! table. The portable backend uses `wide` vectors; the scalar backend is the
//! fallback and the reference for tests.
//!
//! ```rust
//! use tastate_core::simd;
//!
//! let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
//! assert_eq!(simd::sum(&data), 15.0);
//! assert_eq!(simd::sum_of_squares(&data), 55.0);
//! assert_eq!(simd::dot_product(&data, &[1.0; 5]), 15.0);
//! ```
pub mod dispatch;
pub mod portable;
pub mod scalar;

pub use dispatch::{backend, dot_product, sum, sum_of_squares, Backend};
pub use portable::LANES;
