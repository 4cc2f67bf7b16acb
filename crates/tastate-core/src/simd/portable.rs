//! `wide`-vectorised reductions.
//!
//! `wide` lowers to SSE/AVX on x86_64, NEON on aarch64 and SIMD128 on wasm32
//! when those target features are enabled at compile time, and to plain
//! arrays otherwise.

use crate::types::Float;

#[cfg(not(feature = "f32"))]
type SimdVec = wide::f64x4;

#[cfg(feature = "f32")]
type SimdVec = wide::f32x8;

/// Number of `Float` lanes per vector.
#[cfg(not(feature = "f32"))]
pub const LANES: usize = 4;

/// Number of `Float` lanes per vector.
#[cfg(feature = "f32")]
pub const LANES: usize = 8;

#[inline(always)]
fn load(chunk: &[Float]) -> SimdVec {
    let mut lanes = [0.0 as Float; LANES];
    lanes.copy_from_slice(chunk);
    SimdVec::from(lanes)
}

/// Sum of all elements.
#[inline]
pub fn sum(data: &[Float]) -> Float {
    let chunks = data.chunks_exact(LANES);
    let remainder = chunks.remainder();

    let mut acc = SimdVec::ZERO;
    for chunk in chunks {
        acc = acc + load(chunk);
    }

    remainder.iter().fold(acc.reduce_add(), |s, &x| s + x)
}

/// Sum of the squared elements.
#[inline]
pub fn sum_of_squares(data: &[Float]) -> Float {
    let chunks = data.chunks_exact(LANES);
    let remainder = chunks.remainder();

    let mut acc = SimdVec::ZERO;
    for chunk in chunks {
        let v = load(chunk);
        acc = acc + v * v;
    }

    remainder.iter().fold(acc.reduce_add(), |s, &x| s + x * x)
}

/// Dot product over the common prefix of `a` and `b`.
#[inline]
pub fn dot_product(a: &[Float], b: &[Float]) -> Float {
    let n = a.len().min(b.len());
    let (a, b) = (&a[..n], &b[..n]);

    let chunks_a = a.chunks_exact(LANES);
    let chunks_b = b.chunks_exact(LANES);
    let tail_a = chunks_a.remainder();
    let tail_b = chunks_b.remainder();

    let mut acc = SimdVec::ZERO;
    for (ca, cb) in chunks_a.zip(chunks_b) {
        acc = acc + load(ca) * load(cb);
    }

    tail_a
        .iter()
        .zip(tail_b)
        .fold(acc.reduce_add(), |s, (&x, &y)| s + x * y)
}
