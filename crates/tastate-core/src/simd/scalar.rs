//! Scalar fallback implementations of the reductions.
//!
//! These are used when the dispatch table selects [`Backend::Scalar`](super::Backend)
//! and serve as the reference for the vectorised versions in tests.

use crate::types::Float;

/// Sum of all elements.
///
/// ```rust
/// use tastate_core::simd::scalar::sum;
///
/// assert_eq!(sum(&[1.0, 2.0, 3.0, 4.0, 5.0]), 15.0);
/// ```
#[inline]
pub fn sum(data: &[Float]) -> Float {
    data.iter().sum()
}

/// Sum of the squared elements.
#[inline]
pub fn sum_of_squares(data: &[Float]) -> Float {
    data.iter().map(|x| x * x).sum()
}

/// Dot product over the common prefix of `a` and `b`.
///
/// ```rust
/// use tastate_core::simd::scalar::dot_product;
///
/// // (1*4) + (2*5) + (3*6) = 32
/// assert_eq!(dot_product(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
/// ```
#[inline]
pub fn dot_product(a: &[Float], b: &[Float]) -> Float {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_empty() {
        assert_eq!(sum(&[]), 0.0);
    }

    #[test]
    fn test_sum_with_negatives() {
        assert!((sum(&[1.0, -2.0, 3.0, -4.0, 5.0]) - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_sum_of_squares() {
        assert_eq!(sum_of_squares(&[1.0, -2.0, 3.0]), 14.0);
    }

    #[test]
    fn test_dot_product_with_negatives() {
        // (1*4) + (-2*5) + (3*-6) = 4 - 10 - 18 = -24
        assert_eq!(dot_product(&[1.0, -2.0, 3.0], &[4.0, 5.0, -6.0]), -24.0);
    }
}
