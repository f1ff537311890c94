//! Error types for friction parameter construction.

use thiserror::Error;

/// Error returned by the strict [`FrictionParameters::new`] constructor.
///
/// The lenient load path ([`ParameterValidator`]) never produces these; it
/// falls back to defaults and reports [`ParameterWarning`]s instead.
///
/// [`FrictionParameters::new`]: crate::FrictionParameters::new
/// [`ParameterValidator`]: crate::ParameterValidator
/// [`ParameterWarning`]: crate::ParameterWarning
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    /// A parameter that must be strictly positive was not.
    #[error("{name} must be positive, got {value}")]
    NotPositive {
        /// Parameter name as it appears in configuration.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// `slip_dynamic` does not exceed `slip_static`.
    #[error("slip_dynamic {slip_dynamic} must be greater than slip_static {slip_static}")]
    SlipOrder {
        /// Static slip ratio.
        slip_static: f64,
        /// Dynamic slip ratio.
        slip_dynamic: f64,
    },

    /// A parameter is NaN or infinite.
    #[error("{name} must be finite, got {value}")]
    NotFinite {
        /// Parameter name as it appears in configuration.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Result alias for parameter construction.
pub type ParameterResult<T> = std::result::Result<T, ParameterError>;
