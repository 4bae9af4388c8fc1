//! Error types for the Horizon Press button models.

use horizon_press_core::TimerError;

/// Errors raised while configuring a button model.
///
/// These are all detected at construction. Problems that only show up later,
/// such as an external holder taking a value outside the allowed pair, are
/// contract violations and are reported through `tracing` instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ButtonError {
    /// Both values of a two-value button compare equal.
    #[error("Toggle values must be distinct, both are {value}")]
    IndistinctValues { value: String },

    /// The bound value is not one of the values the model may take.
    #[error("Value {value} is not one of the allowed values")]
    ValueOutOfRange { value: String },

    /// A spinner range with no values in it.
    #[error("Spinner range {start}..={end} is empty")]
    EmptyRange { start: i64, end: i64 },

    /// A spinner step that is zero or negative.
    #[error("Spinner delta must be positive, got {delta}")]
    InvalidDelta { delta: i64 },

    /// Invalid repeat timing.
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),
}

/// Result alias for button model construction.
pub type Result<T> = std::result::Result<T, ButtonError>;
