//! Error types for Horizon Press core.

use std::fmt;

/// Timer-specific errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// The timer ID is invalid or the timer has already been cleared.
    InvalidTimerId,
    /// A repeating interval of zero would fire forever within one step.
    ZeroInterval,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimerId => write!(f, "Invalid or expired timer ID"),
            Self::ZeroInterval => write!(f, "Repeating timer interval must be greater than zero"),
        }
    }
}

impl std::error::Error for TimerError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_error_display() {
        assert_eq!(
            TimerError::InvalidTimerId.to_string(),
            "Invalid or expired timer ID"
        );
        assert!(TimerError::ZeroInterval.to_string().contains("greater than zero"));
    }
}
