//! Overlap Studies indicators
//!
//! Indicators plotted on the same scale as the price itself: moving averages
//! of every flavour, Bollinger Bands, and the rolling midpoints.

mod bbands;
mod dema;
mod ema;
mod kama;
mod midpoint;
mod midprice;
mod sma;
mod t3;
mod tema;
mod trima;
mod wma;

pub use bbands::{
    bbands, bbands_into, bbands_next, BBandsMA, BBandsOutput, BBandsResult, BBandsState,
    DeviationMultipliers,
};
pub use dema::{dema, dema_into, dema_next, DemaResult, DemaState};
pub use ema::{ema, ema_into, ema_next, EmaResult, EmaState};
pub use kama::{kama, kama_into, kama_next, KamaResult, KamaState};
pub use midpoint::{midpoint, midpoint_into, midpoint_next, MidpointResult, MidpointState};
pub use midprice::{midprice, midprice_into, midprice_next, MidpriceResult, MidpriceState};
pub use sma::{sma, sma_into, sma_next, SmaResult, SmaState};
pub use t3::{t3, t3_into, t3_next, T3Result, T3State, DEFAULT_VOLUME_FACTOR};
pub use tema::{tema, tema_into, tema_next, TemaResult, TemaState};
pub use trima::{trima, trima_into, trima_next, trima_stage_lengths, TrimaResult, TrimaState};
pub use wma::{wma, wma_into, wma_next, WmaResult, WmaState};
