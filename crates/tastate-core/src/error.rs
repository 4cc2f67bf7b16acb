//! Error types for indicator configuration and driver misuse
//!
//! Only two situations are reported as errors: a parameter set that can never
//! produce a valid indicator, and a call that violates the driver contract
//! (mismatched buffers, a state that does not match its own parameters, a sample
//! of the wrong kind). Short input and NaN samples are *not* errors; they show up
//! as NaN outputs and a warming-up state.

use thiserror::Error;

/// Error type for indicator operations
///
/// Every fallible operation in the crate returns a `Result<T, TaError>`.
/// Errors are raised before any sample is processed, so a failed call never
/// leaves partial output behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TaError {
    /// Interface misuse: buffer length mismatch, wrong sample kind, ...
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of the invalid input
        message: String,
    },

    /// A period that no indicator can be built from (zero, or too small for the indicator)
    #[error("Invalid period {period}: {reason}")]
    InvalidPeriod {
        /// The rejected period
        period: usize,
        /// Why it was rejected
        reason: String,
    },

    /// Any other parameter outside its domain (alpha, band multipliers, fast >= slow)
    #[error("Invalid parameter '{name}': got '{value}', expected {expected}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Rejected value, formatted
        value: String,
        /// Description of the accepted domain
        expected: String,
    },

    /// A state value whose internals disagree with its own parameters
    #[error("Invalid {indicator} state: {reason}")]
    InvalidState {
        /// Name of the indicator owning the state
        indicator: &'static str,
        /// What is inconsistent
        reason: String,
    },

    /// A runtime configuration document that could not be decoded
    #[error("Invalid configuration: {message}")]
    Config {
        /// Decoder message
        message: String,
    },
}

impl TaError {
    /// Creates an InvalidInput error
    ///
    /// # Example
    ///
    /// ```rust
    /// use tastate_core::error::TaError;
    ///
    /// let err = TaError::invalid_input("high and low must have the same length");
    /// assert!(err.to_string().starts_with("Invalid input"));
    /// ```
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        TaError::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an InvalidPeriod error
    ///
    /// ```rust
    /// use tastate_core::error::TaError;
    ///
    /// let err = TaError::invalid_period(0, "period must be greater than zero");
    /// assert_eq!(err.to_string(), "Invalid period 0: period must be greater than zero");
    /// ```
    pub fn invalid_period<S: Into<String>>(period: usize, reason: S) -> Self {
        TaError::InvalidPeriod {
            period,
            reason: reason.into(),
        }
    }

    /// Creates an InvalidParameter error
    pub fn invalid_parameter<N, V, E>(name: N, value: V, expected: E) -> Self
    where
        N: Into<String>,
        V: ToString,
        E: Into<String>,
    {
        TaError::InvalidParameter {
            name: name.into(),
            value: value.to_string(),
            expected: expected.into(),
        }
    }

    /// Creates an InvalidState error
    pub fn invalid_state<S: Into<String>>(indicator: &'static str, reason: S) -> Self {
        TaError::InvalidState {
            indicator,
            reason: reason.into(),
        }
    }

    /// Shorthand for an output buffer whose length does not match the input
    pub fn length_mismatch(what: &str, expected: usize, actual: usize) -> Self {
        TaError::invalid_input(format!(
            "{what} has length {actual}, expected {expected}"
        ))
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for TaError {
    fn from(err: serde_json::Error) -> Self {
        TaError::Config {
            message: err.to_string(),
        }
    }
}

/// Result type alias for indicator operations
///
/// ```rust
/// use tastate_core::error::{Result, TaError};
///
/// fn checked(period: usize) -> Result<usize> {
///     if period == 0 {
///         return Err(TaError::invalid_period(period, "must be positive"));
///     }
///     Ok(period)
/// }
/// assert!(checked(0).is_err());
/// ```
pub type Result<T> = core::result::Result<T, TaError>;

/// Rejects a zero period.
pub(crate) fn check_period(name: &str, period: usize) -> Result<()> {
    if period == 0 {
        return Err(TaError::invalid_period(
            period,
            format!("{name} must be greater than zero"),
        ));
    }
    Ok(())
}

/// Rejects a smoothing factor outside `(0, 1]`.
pub(crate) fn check_alpha(alpha: crate::Float) -> Result<()> {
    if !(alpha > 0.0 && alpha <= 1.0) {
        return Err(TaError::invalid_parameter("alpha", alpha, "value in (0.0, 1.0]"));
    }
    Ok(())
}
