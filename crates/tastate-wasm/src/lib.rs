//! tastate-wasm: WebAssembly bindings for tastate-core
//!
//! JavaScript works with a single class, [`TaIndicator`], built from a JSON
//! configuration such as `{"indicator": "RSI", "period": 14}`. It keeps the
//! state of the last call, so a page can run a batch over history and then
//! feed live samples one by one.
//!
//! Multi-output indicators (MACD, BBANDS) return their columns concatenated,
//! in the order given by [`TaIndicator::columns`].

use wasm_bindgen::prelude::*;

use tastate_core::{
    Float, HighLow, IndicatorConfig, IndicatorResult, IndicatorState, IndicatorValue, Resettable,
    Sample, Series,
};

#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// An indicator together with its running state.
#[wasm_bindgen]
pub struct TaIndicator {
    config: IndicatorConfig,
    state: IndicatorState,
}

#[wasm_bindgen]
impl TaIndicator {
    /// Builds a warming-up indicator from a JSON configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config: &str) -> Result<TaIndicator, JsError> {
        let config = IndicatorConfig::from_json(config)?;
        let state = config.build()?;
        Ok(Self { config, state })
    }

    /// Rebuilds an indicator from its configuration and a saved state.
    pub fn restore(config: &str, state: &str) -> Result<TaIndicator, JsError> {
        let config = IndicatorConfig::from_json(config)?;
        let state: IndicatorState = serde_json::from_str(state)?;
        state.validate()?;
        if state.name() != config.name() {
            return Err(JsError::new(&format!(
                "state is for {}, configuration is for {}",
                state.name(),
                config.name()
            )));
        }
        Ok(Self { config, state })
    }

    /// Upper-case indicator name.
    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.config.name().to_string()
    }

    /// Number of leading outputs that are NaN.
    #[wasm_bindgen(getter)]
    pub fn lookback(&self) -> usize {
        self.state.lookback()
    }

    /// Whether the warm-up is over.
    #[wasm_bindgen(getter, js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    /// Output column names.
    #[wasm_bindgen(getter)]
    pub fn columns(&self) -> Vec<String> {
        column_names(&self.config).iter().map(|c| c.to_string()).collect()
    }

    /// Computes a whole series from scratch and keeps the final state.
    pub fn batch(&mut self, data: &[Float]) -> Result<Vec<Float>, JsError> {
        let result = self.config.batch(Series::Values(data))?;
        Ok(self.keep(result))
    }

    /// Like [`batch`](Self::batch), for high/low indicators.
    #[wasm_bindgen(js_name = batchHighLow)]
    pub fn batch_high_low(&mut self, high: &[Float], low: &[Float]) -> Result<Vec<Float>, JsError> {
        let result = self.config.batch(Series::HighLow { high, low })?;
        Ok(self.keep(result))
    }

    /// Advances by one value and returns one output per column.
    pub fn next(&mut self, value: Float) -> Result<Vec<Float>, JsError> {
        Ok(self.step(Sample::Value(value))?)
    }

    /// Advances by one high/low bar.
    #[wasm_bindgen(js_name = nextHighLow)]
    pub fn next_high_low(&mut self, high: Float, low: Float) -> Result<Vec<Float>, JsError> {
        Ok(self.step(HighLow::new(high, low).into())?)
    }

    /// Returns to the warm-up condition.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// The current state as JSON, for [`restore`](Self::restore).
    #[wasm_bindgen(js_name = stateJson)]
    pub fn state_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.state)?)
    }
}

impl TaIndicator {
    fn keep(&mut self, result: IndicatorResult) -> Vec<Float> {
        self.state = result.state();
        result
            .columns()
            .into_iter()
            .flat_map(|(_, column)| column.iter().copied())
            .collect()
    }

    fn step(&mut self, sample: Sample) -> tastate_core::Result<Vec<Float>> {
        let (value, state) = self.state.next(sample)?;
        self.state = state;
        Ok(flatten(value))
    }
}

fn column_names(config: &IndicatorConfig) -> &'static [&'static str] {
    match config {
        IndicatorConfig::Macd(_) => &["macd", "signal", "histogram"],
        IndicatorConfig::BBands(_) => &["upper", "middle", "lower"],
        _ => &["values"],
    }
}

fn flatten(value: IndicatorValue) -> Vec<Float> {
    match value {
        IndicatorValue::Single(v) => vec![v],
        IndicatorValue::Macd(m) => vec![m.macd, m.signal, m.histogram],
        IndicatorValue::BBands(b) => vec![b.upper, b.middle, b.lower],
    }
}
