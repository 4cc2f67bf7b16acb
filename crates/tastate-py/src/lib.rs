//! tastate-py: Python bindings for tastate-core
//!
//! Every indicator is exposed as a pair of functions:
//!
//! - `xxx(data, ...)` takes a numpy array and returns `(values, state)`; the
//!   GIL is released while the series is processed.
//! - `xxx_next(value, state)` returns `(value, new_state)` and leaves `state`
//!   untouched.
//!
//! States are immutable-looking Python objects with read-only getters for
//! their last output and parameters, plus `to_json`/`from_json` for storage.
//!
//! Note: This crate requires a Python 3.x interpreter to build.

use numpy::{IntoPyArray, PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use tastate_core::momentum::{self, MacdState, RocState, RsiState};
use tastate_core::overlap::{
    self, BBandsMA, BBandsState, DemaState, DeviationMultipliers, EmaState, KamaState,
    MidpointState, MidpriceState, SmaState, T3State, TemaState, TrimaState, WmaState,
};
use tastate_core::{Float, Indicator, Resettable, TaError};

type Array<'py> = Bound<'py, PyArray1<Float>>;

fn to_py_err(err: TaError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

macro_rules! py_state {
    ($py:ident, $name:literal, $inner:ty { $($getter:ident: $ty:ty = |$s:ident| $body:expr),* $(,)? }) => {
        #[doc = concat!("Saved ", $name, ".")]
        #[pyclass(name = $name, module = "tastate", frozen)]
        #[derive(Clone)]
        pub struct $py {
            inner: $inner,
        }

        #[pymethods]
        impl $py {
            $(
                #[getter]
                fn $getter(&self) -> $ty {
                    let $s = &self.inner;
                    $body
                }
            )*

            #[getter]
            fn lookback(&self) -> usize {
                self.inner.lookback()
            }

            #[getter]
            fn is_ready(&self) -> bool {
                self.inner.is_ready()
            }

            /// A copy of this state reset to warm-up.
            fn reset(&self) -> Self {
                let mut inner = self.inner.clone();
                inner.reset();
                Self { inner }
            }

            fn to_json(&self) -> PyResult<String> {
                serde_json::to_string(&self.inner).map_err(|e| to_py_err(e.into()))
            }

            #[staticmethod]
            fn from_json(json: &str) -> PyResult<Self> {
                let inner: $inner = serde_json::from_str(json).map_err(|e| to_py_err(e.into()))?;
                inner.validate().map_err(to_py_err)?;
                Ok(Self { inner })
            }

            fn __repr__(&self) -> String {
                format!("{:?}", self.inner)
            }
        }
    };
}

py_state!(PySmaState, "SmaState", SmaState { sma: Float = |s| s.sma, period: usize = |s| s.period });
py_state!(PyWmaState, "WmaState", WmaState { wma: Float = |s| s.wma, period: usize = |s| s.period });
py_state!(PyEmaState, "EmaState", EmaState {
    ema: Float = |s| s.ema,
    period: usize = |s| s.period,
    alpha: Float = |s| s.alpha(),
});
py_state!(PyDemaState, "DemaState", DemaState {
    dema: Float = |s| s.dema,
    period: usize = |s| s.period,
    alpha: Float = |s| s.alpha(),
});
py_state!(PyTemaState, "TemaState", TemaState {
    tema: Float = |s| s.tema,
    period: usize = |s| s.period,
    alpha: Float = |s| s.alpha(),
});
py_state!(PyTrimaState, "TrimaState", TrimaState { trima: Float = |s| s.trima, period: usize = |s| s.period });
py_state!(PyKamaState, "KamaState", KamaState { kama: Float = |s| s.kama, period: usize = |s| s.period });
py_state!(PyT3State, "T3State", T3State {
    t3: Float = |s| s.t3,
    period: usize = |s| s.period,
    volume_factor: Float = |s| s.volume_factor,
});
py_state!(PyRsiState, "RsiState", RsiState {
    rsi: Float = |s| s.rsi,
    avg_gain: Float = |s| s.avg_gain,
    avg_loss: Float = |s| s.avg_loss,
    period: usize = |s| s.period,
});
py_state!(PyMacdState, "MacdState", MacdState {
    macd: Float = |s| s.macd,
    signal: Float = |s| s.signal,
    histogram: Float = |s| s.histogram,
    fast_period: usize = |s| s.fast_period,
    slow_period: usize = |s| s.slow_period,
    signal_period: usize = |s| s.signal_period,
});
py_state!(PyBBandsState, "BBandsState", BBandsState {
    upper: Float = |s| s.upper,
    middle: Float = |s| s.middle,
    lower: Float = |s| s.lower,
    period: usize = |s| s.period,
    nbdev_up: Float = |s| s.multipliers.up,
    nbdev_down: Float = |s| s.multipliers.down,
    uses_ema: bool = |s| matches!(s.ma, BBandsMA::Ema(_)),
});
py_state!(PyRocState, "RocState", RocState { roc: Float = |s| s.roc, period: usize = |s| s.period });
py_state!(PyMidpointState, "MidpointState", MidpointState {
    midpoint: Float = |s| s.midpoint,
    period: usize = |s| s.period,
});
py_state!(PyMidpriceState, "MidpriceState", MidpriceState {
    midprice: Float = |s| s.midprice,
    period: usize = |s| s.period,
});

/// Batch and incremental functions for indicators with a single value input
/// and output.
macro_rules! py_single {
    ($batch:ident, $next:ident, $py:ident, ($($arg:ident: $ty:ty $(= $default:expr)?),*)) => {
        #[pyfunction]
        #[pyo3(signature = (data, $($arg $(= $default)?),*))]
        fn $batch<'py>(
            py: Python<'py>,
            data: PyReadonlyArray1<'py, Float>,
            $($arg: $ty),*
        ) -> PyResult<(Array<'py>, $py)> {
            let data = data.as_slice()?;
            let result = py
                .allow_threads(|| kernels::$batch(data, $($arg),*))
                .map_err(to_py_err)?;
            Ok((result.values.into_pyarray_bound(py), $py { inner: result.state }))
        }

        #[pyfunction]
        fn $next(value: Float, state: &$py) -> PyResult<(Float, $py)> {
            let step = kernels::$next(value, &state.inner).map_err(to_py_err)?;
            Ok((step.value, $py { inner: step.state }))
        }
    };
}

mod kernels {
    pub use tastate_core::momentum::{roc, roc_next, rsi, rsi_next};
    pub use tastate_core::overlap::{
        dema, dema_next, ema, ema_next, kama, kama_next, midpoint, midpoint_next, sma, sma_next,
        t3, t3_next, tema, tema_next, trima, trima_next, wma, wma_next,
    };
}

py_single!(sma, sma_next, PySmaState, (period: usize = 30));
py_single!(wma, wma_next, PyWmaState, (period: usize = 30));
py_single!(ema, ema_next, PyEmaState, (period: usize = 30, alpha: Option<Float> = None));
py_single!(dema, dema_next, PyDemaState, (period: usize = 30, alpha: Option<Float> = None));
py_single!(tema, tema_next, PyTemaState, (period: usize = 30, alpha: Option<Float> = None));
py_single!(trima, trima_next, PyTrimaState, (period: usize = 30));
py_single!(kama, kama_next, PyKamaState, (period: usize = 30));
py_single!(t3, t3_next, PyT3State, (period: usize = 5, volume_factor: Float = 0.7));
py_single!(rsi, rsi_next, PyRsiState, (period: usize = 14));
py_single!(roc, roc_next, PyRocState, (period: usize = 10));
py_single!(midpoint, midpoint_next, PyMidpointState, (period: usize = 14));

#[pyfunction]
#[pyo3(signature = (data, fast_period = 12, slow_period = 26, signal_period = 9))]
fn macd<'py>(
    py: Python<'py>,
    data: PyReadonlyArray1<'py, Float>,
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> PyResult<(Array<'py>, Array<'py>, Array<'py>, PyMacdState)> {
    let data = data.as_slice()?;
    let result = py
        .allow_threads(|| momentum::macd(data, fast_period, slow_period, signal_period))
        .map_err(to_py_err)?;
    Ok((
        result.macd.into_pyarray_bound(py),
        result.signal.into_pyarray_bound(py),
        result.histogram.into_pyarray_bound(py),
        PyMacdState { inner: result.state },
    ))
}

#[pyfunction]
fn macd_next(value: Float, state: &PyMacdState) -> PyResult<((Float, Float, Float), PyMacdState)> {
    let step = momentum::macd_next(value, &state.inner).map_err(to_py_err)?;
    let out = step.value;
    Ok(((out.macd, out.signal, out.histogram), PyMacdState { inner: step.state }))
}

#[pyfunction]
#[pyo3(signature = (data, period = 5, nbdev_up = 2.0, nbdev_down = 2.0, ema = false, alpha = None))]
fn bbands<'py>(
    py: Python<'py>,
    data: PyReadonlyArray1<'py, Float>,
    period: usize,
    nbdev_up: Float,
    nbdev_down: Float,
    ema: bool,
    alpha: Option<Float>,
) -> PyResult<(Array<'py>, Array<'py>, Array<'py>, PyBBandsState)> {
    let data = data.as_slice()?;
    let multipliers = DeviationMultipliers {
        up: nbdev_up,
        down: nbdev_down,
    };
    let ma = if ema { BBandsMA::Ema(alpha) } else { BBandsMA::Sma };
    let result = py
        .allow_threads(|| overlap::bbands(data, period, multipliers, ma))
        .map_err(to_py_err)?;
    Ok((
        result.upper.into_pyarray_bound(py),
        result.middle.into_pyarray_bound(py),
        result.lower.into_pyarray_bound(py),
        PyBBandsState { inner: result.state },
    ))
}

#[pyfunction]
fn bbands_next(
    value: Float,
    state: &PyBBandsState,
) -> PyResult<((Float, Float, Float), PyBBandsState)> {
    let step = overlap::bbands_next(value, &state.inner).map_err(to_py_err)?;
    let out = step.value;
    Ok(((out.upper, out.middle, out.lower), PyBBandsState { inner: step.state }))
}

#[pyfunction]
#[pyo3(signature = (high, low, period = 14))]
fn midprice<'py>(
    py: Python<'py>,
    high: PyReadonlyArray1<'py, Float>,
    low: PyReadonlyArray1<'py, Float>,
    period: usize,
) -> PyResult<(Array<'py>, PyMidpriceState)> {
    let (high, low) = (high.as_slice()?, low.as_slice()?);
    let result = py
        .allow_threads(|| overlap::midprice(high, low, period))
        .map_err(to_py_err)?;
    Ok((result.values.into_pyarray_bound(py), PyMidpriceState { inner: result.state }))
}

#[pyfunction]
fn midprice_next(high: Float, low: Float, state: &PyMidpriceState) -> PyResult<(Float, PyMidpriceState)> {
    let step = overlap::midprice_next(high, low, &state.inner).map_err(to_py_err)?;
    Ok((step.value, PyMidpriceState { inner: step.state }))
}

/// Python module for technical analysis indicators
#[pymodule]
fn tastate(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySmaState>()?;
    m.add_class::<PyWmaState>()?;
    m.add_class::<PyEmaState>()?;
    m.add_class::<PyDemaState>()?;
    m.add_class::<PyTemaState>()?;
    m.add_class::<PyTrimaState>()?;
    m.add_class::<PyKamaState>()?;
    m.add_class::<PyT3State>()?;
    m.add_class::<PyRsiState>()?;
    m.add_class::<PyMacdState>()?;
    m.add_class::<PyBBandsState>()?;
    m.add_class::<PyRocState>()?;
    m.add_class::<PyMidpointState>()?;
    m.add_class::<PyMidpriceState>()?;

    m.add_function(wrap_pyfunction!(sma, m)?)?;
    m.add_function(wrap_pyfunction!(sma_next, m)?)?;
    m.add_function(wrap_pyfunction!(wma, m)?)?;
    m.add_function(wrap_pyfunction!(wma_next, m)?)?;
    m.add_function(wrap_pyfunction!(ema, m)?)?;
    m.add_function(wrap_pyfunction!(ema_next, m)?)?;
    m.add_function(wrap_pyfunction!(dema, m)?)?;
    m.add_function(wrap_pyfunction!(dema_next, m)?)?;
    m.add_function(wrap_pyfunction!(tema, m)?)?;
    m.add_function(wrap_pyfunction!(tema_next, m)?)?;
    m.add_function(wrap_pyfunction!(trima, m)?)?;
    m.add_function(wrap_pyfunction!(trima_next, m)?)?;
    m.add_function(wrap_pyfunction!(kama, m)?)?;
    m.add_function(wrap_pyfunction!(kama_next, m)?)?;
    m.add_function(wrap_pyfunction!(t3, m)?)?;
    m.add_function(wrap_pyfunction!(t3_next, m)?)?;
    m.add_function(wrap_pyfunction!(rsi, m)?)?;
    m.add_function(wrap_pyfunction!(rsi_next, m)?)?;
    m.add_function(wrap_pyfunction!(macd, m)?)?;
    m.add_function(wrap_pyfunction!(macd_next, m)?)?;
    m.add_function(wrap_pyfunction!(bbands, m)?)?;
    m.add_function(wrap_pyfunction!(bbands_next, m)?)?;
    m.add_function(wrap_pyfunction!(roc, m)?)?;
    m.add_function(wrap_pyfunction!(roc_next, m)?)?;
    m.add_function(wrap_pyfunction!(midpoint, m)?)?;
    m.add_function(wrap_pyfunction!(midpoint_next, m)?)?;
    m.add_function(wrap_pyfunction!(midprice, m)?)?;
    m.add_function(wrap_pyfunction!(midprice_next, m)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_returns_new_state() {
        let state = PySmaState {
            inner: SmaState::new(2).unwrap(),
        };
        let (first, state) = sma_next(1.0, &state).unwrap();
        assert!(first.is_nan());
        let (second, next) = sma_next(3.0, &state).unwrap();
        assert_eq!(second, 2.0);
        assert!(next.is_ready());
        assert!(!state.is_ready());
    }

    #[test]
    fn test_getters_read_state() {
        let state = PyMacdState {
            inner: MacdState::new(12, 26, 9).unwrap(),
        };
        assert_eq!(state.lookback(), 33);
        assert_eq!(state.slow_period(), 26);
        assert!(state.macd().is_nan());
    }

    #[test]
    fn test_warming_up_state_json_round_trip() {
        let state = PyRsiState {
            inner: rsi_state_after(&[1.0, 2.0]),
        };
        let restored = PyRsiState::from_json(&state.to_json().unwrap()).unwrap();
        assert_eq!(restored.inner, state.inner);
        assert!(restored.rsi().is_nan());
    }

    fn rsi_state_after(data: &[Float]) -> RsiState {
        momentum::rsi(data, 5).unwrap().state
    }
}
