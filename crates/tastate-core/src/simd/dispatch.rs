//! Runtime selection of the reduction backend.
//!
//! The dispatch table is initialised once through `OnceLock`; afterwards every
//! call is a load from a static plus an indirect call. The table is the only
//! process-wide item in the crate and is immutable after initialisation.

use std::sync::OnceLock;

use super::{portable, scalar};
use crate::types::Float;

/// Signature of a single-slice reduction.
pub type ReduceFn = fn(&[Float]) -> Float;

/// Signature of a two-slice reduction.
pub type DotProductFn = fn(&[Float], &[Float]) -> Float;

/// Implementation family behind the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Backend {
    /// Plain iterator folds.
    Scalar,
    /// `wide` vectors, [`LANES`](super::LANES) lanes wide.
    Portable,
}

/// Function pointers for every reduction.
#[derive(Debug, Clone, Copy)]
pub struct DispatchTable {
    /// Which family the pointers belong to
    pub backend: Backend,
    /// Sum of elements
    pub sum: ReduceFn,
    /// Sum of squared elements
    pub sum_of_squares: ReduceFn,
    /// Dot product
    pub dot_product: DotProductFn,
}

impl DispatchTable {
    const fn scalar() -> Self {
        Self {
            backend: Backend::Scalar,
            sum: scalar::sum,
            sum_of_squares: scalar::sum_of_squares,
            dot_product: scalar::dot_product,
        }
    }

    const fn portable() -> Self {
        Self {
            backend: Backend::Portable,
            sum: portable::sum,
            sum_of_squares: portable::sum_of_squares,
            dot_product: portable::dot_product,
        }
    }
}

static DISPATCH: OnceLock<DispatchTable> = OnceLock::new();

#[cold]
fn init_dispatch() -> DispatchTable {
    let table = if cfg!(any(
        target_arch = "x86_64",
        target_arch = "aarch64",
        target_arch = "wasm32"
    )) {
        DispatchTable::portable()
    } else {
        DispatchTable::scalar()
    };
    tracing::debug!(backend = ?table.backend, "simd dispatch initialised");
    table
}

/// Global dispatch table, initialised on first access.
#[inline]
pub fn get_dispatch() -> &'static DispatchTable {
    DISPATCH.get_or_init(init_dispatch)
}

/// The backend the dispatch table selected.
#[inline]
pub fn backend() -> Backend {
    get_dispatch().backend
}

/// Sum of all elements of `data`.
#[inline]
pub fn sum(data: &[Float]) -> Float {
    (get_dispatch().sum)(data)
}

/// Sum of the squared elements of `data`.
#[inline]
pub fn sum_of_squares(data: &[Float]) -> Float {
    (get_dispatch().sum_of_squares)(data)
}

/// Dot product of `a` and `b` over their common prefix.
#[inline]
pub fn dot_product(a: &[Float], b: &[Float]) -> Float {
    (get_dispatch().dot_product)(a, b)
}
