//! tastate-core: technical analysis indicators with resumable state
//!
//! Every indicator can run in two modes that produce identical numbers:
//!
//! - **Batch**: `xxx(data, ..)` computes the whole series and also returns the
//!   state after the last sample.
//! - **Incremental**: `xxx_next(sample, &state)` advances a saved state by one
//!   sample and returns the new value together with the new state.
//!
//! ```rust
//! use tastate_core::momentum::{rsi, rsi_next};
//!
//! let closes = [44.3, 44.1, 44.2, 43.6, 44.3, 44.8, 45.1, 45.4, 45.8];
//! let head = rsi(&closes[..8], 5).unwrap();
//! let step = rsi_next(closes[8], &head.state).unwrap();
//!
//! let full = rsi(&closes, 5).unwrap();
//! assert_eq!(step.value, full.values[8]);
//! assert_eq!(step.state, full.state);
//! ```
//!
//! # Features
//!
//! - `f64` (default): Double-precision floating-point
//! - `f32`: Single-precision floating-point
//! - `serde` (default): Serialisable states, JSON configuration
//! - `parallel` (default): rayon fan-out over many series
//!
//! # Modules
//!
//! - [`overlap`]: Moving averages, bands and range midpoints
//! - [`momentum`]: RSI, MACD, ROC
//! - [`accumulators`]: Reusable rolling statistics
//! - [`driver`]: Generic batch and incremental drivers
//! - [`state`], [`config`]: Runtime-selected indicators
//! - [`simd`]: Vectorised reductions

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[macro_use]
pub mod types;

pub mod accumulators;
pub mod config;
pub mod driver;
pub mod error;
pub mod momentum;
pub mod overlap;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod simd;
pub mod state;
pub mod traits;

pub use config::IndicatorConfig;
pub use driver::Next;
pub use error::{Result, TaError};
pub use state::{IndicatorResult, IndicatorState, IndicatorValue, Sample, Series};
pub use traits::{Indicator, Resettable};
pub use types::{Float, HighLow};
