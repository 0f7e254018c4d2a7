//! Error types for optionpricer.
//!
//! Every pricing failure is reported through a single `thiserror`-derived
//! enum. Validation happens at the dispatcher boundary, so a caller either
//! gets a fully populated result or one of these variants, never a result
//! carrying `NaN`.

use thiserror::Error;

/// The top-level error type used throughout optionpricer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A market input or model parameter is outside its admissible range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A constraint between otherwise valid parameters does not hold
    /// (e.g. the Variance-Gamma martingale correction is undefined).
    #[error("parameter constraint violated: {0}")]
    ParameterConstraintViolated(String),

    /// A Monte Carlo run was stopped through its cancellation token.
    #[error("simulation cancelled after {completed} of {requested} paths")]
    Cancelled {
        /// Paths finished before the token was observed.
        completed: usize,
        /// Paths the run was asked for.
        requested: usize,
    },

    /// Malformed settings (environment variable or settings file).
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand `Result` type used throughout optionpricer.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::InvalidInput(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use op_core::{ensure, errors::Error};
/// fn positive(x: f64) -> op_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::InvalidInput(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidInput(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::ParameterConstraintViolated(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use op_core::{ensure_constraint, errors::Error};
/// fn log_arg(x: f64) -> op_core::errors::Result<f64> {
///     ensure_constraint!(x > 0.0, "log argument must be positive, got {x}");
///     Ok(x.ln())
/// }
/// assert!(log_arg(1.0).is_ok());
/// assert!(matches!(log_arg(0.0), Err(Error::ParameterConstraintViolated(_))));
/// ```
#[macro_export]
macro_rules! ensure_constraint {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::ParameterConstraintViolated(
                format!($($msg)*)
            ));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checked_strike(k: f64) -> Result<f64> {
        ensure!(k > 0.0, "strike must be positive, got {k}");
        Ok(k)
    }

    #[test]
    fn ensure_maps_to_invalid_input() {
        assert_eq!(checked_strike(100.0), Ok(100.0));
        assert_eq!(
            checked_strike(0.0),
            Err(Error::InvalidInput("strike must be positive, got 0".into()))
        );
    }

    #[test]
    fn every_variant_names_its_kind() {
        let errors = [
            Error::InvalidInput("strike".into()),
            Error::ParameterConstraintViolated("log argument".into()),
            Error::Cancelled {
                completed: 0,
                requested: 1,
            },
            Error::Config("vg_paths".into()),
        ];
        for e in errors {
            let kind = match &e {
                Error::InvalidInput(_) => "invalid input",
                Error::ParameterConstraintViolated(_) => "parameter constraint violated",
                Error::Cancelled { .. } => "simulation cancelled",
                Error::Config(_) => "configuration error",
            };
            assert!(e.to_string().starts_with(kind), "{e}");
        }
    }

    #[test]
    fn cancelled_message() {
        let e = Error::Cancelled {
            completed: 10,
            requested: 100,
        };
        assert_eq!(e.to_string(), "simulation cancelled after 10 of 100 paths");
    }
}
