//! Error types for the rdk engine.
//!
//! The engine itself has a single failure surface: an invalid trial
//! configuration, rejected when a [`DotField`](crate::DotField) is built.
//! Every variant names the offending field so the experiment controller can
//! report exactly what it handed over.

use thiserror::Error;

/// Errors produced while building or exporting a motion field.
#[derive(Debug, Error)]
pub enum RdkError {
    /// A required configuration key was absent from the params object.
    #[error("parameter not found: {0}")]
    ParamNotFound(String),

    /// A configuration key existed but had the wrong JSON type.
    #[error("parameter type mismatch for '{name}': expected {expected}, got {got}")]
    ParamTypeMismatch {
        name: String,
        expected: String,
        got: String,
    },

    /// A floating-point field was NaN or infinite.
    #[error("invalid configuration: '{field}' must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    /// A field that must be strictly positive was zero or negative.
    #[error("invalid configuration: '{field}' must be > 0, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    /// A field that must be non-negative was negative.
    #[error("invalid configuration: '{field}' must be >= 0, got {value}")]
    Negative { field: &'static str, value: f64 },

    /// A field fell outside its closed interval.
    #[error("invalid configuration: '{field}' must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Dots would cover an aperture diameter or more in two ticks.
    #[error(
        "invalid configuration: 'velocity' must be < aperture_radius ({aperture_radius}), got {velocity}"
    )]
    TooFast { velocity: f64, aperture_radius: f64 },

    /// An integer count or period was zero.
    #[error("invalid configuration: '{0}' must be at least 1")]
    ZeroCount(&'static str),

    /// Frame export failed (buffer mismatch, file write).
    #[error("i/o error: {0}")]
    Io(String),
}

impl RdkError {
    /// Returns true for every variant raised by configuration parsing or validation.
    pub fn is_config(&self) -> bool {
        !matches!(self, RdkError::Io(_))
    }
}
