//! Prelude module for Horizon Press.
//!
//! This module re-exports the most commonly used types for convenient importing:
//!
//! ```
//! use horizon_press::prelude::*;
//! ```
//!
//! This provides access to:
//! - Signal/slot and property system (`Signal`, `Property`, `ReadOnlyProperty`)
//! - Timers (`TimerQueue`, `RepeatTimer`, `RepeatTimerOptions`)
//! - Input events and interaction states
//! - Every button model and its options

// ============================================================================
// Signal/Slot and Property System
// ============================================================================

pub use crate::signal::{ConnectionId, Signal};
pub use crate::property::{Property, ReadOnlyProperty};

// ============================================================================
// Timers
// ============================================================================

pub use crate::{RepeatTimer, RepeatTimerOptions, TimerQueue};

// ============================================================================
// Input and Appearance
// ============================================================================

pub use crate::widget::{
    ButtonInput, ButtonSignals, InteractionState, Key, KeyRepeatBridge, KeyRepeatOptions,
    PointerKind,
};

// ============================================================================
// Button Models
// ============================================================================

pub use crate::widget::widgets::{
    ButtonModel, NumberSpinnerModel, NumberSpinnerOptions, PushButtonModel, PushButtonOptions,
    RadioButtonGroup, RadioButtonModel, StickyToggleButtonModel, ToggleButtonModel,
};

// ============================================================================
// Errors
// ============================================================================

pub use crate::ButtonError;
