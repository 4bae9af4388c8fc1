//! Logging facilities for Horizon Press.
//!
//! Horizon Press uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_press=debug,horizon_press_core::timer=trace")
//!         .init();
//! }
//! ```
//!
//! Button fires and toggles log at `debug`, per-transition and per-tick detail
//! at `trace`. Contract violations that are tolerated in release builds log at
//! `error`.

/// Span names used throughout Horizon Press for tracing.
pub mod span_names {
    /// Button fire span.
    pub const FIRE: &str = "horizon_press::fire";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "horizon_press_core";
    /// Timer queue and repeat timer target.
    pub const TIMER: &str = "horizon_press_core::timer";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_press_core::signal";
    /// Property system target.
    pub const PROPERTY: &str = "horizon_press_core::property";
    /// Button models target.
    pub const BUTTON: &str = "horizon_press::button";
    /// Keyboard repeat target.
    pub const KEYBOARD: &str = "horizon_press::keyboard";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_press::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Logs misuse of a model, such as input after dispose.
///
/// Thin wrapper around `tracing::warn!` with the crate-wide target. Callers
/// need `tracing` as a dependency.
#[macro_export]
macro_rules! press_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "horizon_press", $($arg)*)
    };
}

/// Logs a contract violation that release builds tolerate.
#[macro_export]
macro_rules! press_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "horizon_press", $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        // Just ensure it doesn't panic without a subscriber.
        let _span = PerfSpan::new("test_operation");
    }

    #[test]
    fn test_macros_expand_without_subscriber() {
        crate::press_warn!(input = "key_down", "ignored");
        crate::press_error!(value = 3, "outside its pair");
    }

    #[test]
    fn test_targets_share_crate_prefixes() {
        assert!(targets::TIMER.starts_with(targets::CORE));
        assert!(targets::SIGNAL.starts_with(targets::CORE));
        assert!(targets::BUTTON.starts_with("horizon_press::"));
    }
}
