//! Momentum indicators
//!
//! Oscillators measuring the speed or strength of price changes rather than
//! the price level.

mod macd;
mod roc;
mod rsi;

pub use macd::{macd, macd_into, macd_next, MacdOutput, MacdResult, MacdState};
pub use roc::{roc, roc_into, roc_next, RocResult, RocState};
pub use rsi::{rsi, rsi_into, rsi_next, RsiResult, RsiState};
