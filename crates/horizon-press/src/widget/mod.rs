//! Button interaction system for Horizon Press.
//!
//! This module turns raw pointer, focus and keyboard input into two outputs:
//!
//! - an [`InteractionState`] per button, for renderers;
//! - fire events, exactly once per activation or per repeat tick.
//!
//! # Overview
//!
//! Input flows one way:
//!
//! ```text
//! ButtonInput -> InteractionSignalTracker -> ButtonModel::transitions
//!             -> PushButtonModel / StickyToggleButtonModel / ... -> fired
//! ```
//!
//! [`InteractionSignalTracker`] folds raw [`ButtonInput`] events into
//! [`ButtonSignals`]. A [`ButtonModel`](widgets::ButtonModel) owns a tracker,
//! follows the consumer's enabled property, and publishes every change. The
//! firing models in [`widgets`] subscribe to those changes and decide when to
//! fire, using a [`RepeatTimer`](horizon_press_core::RepeatTimer) for
//! press-and-hold. [`resolve_interaction_state`] derives appearance from the
//! current signals alone.
//!
//! Keyboard hold-to-repeat for composite widgets goes through a
//! [`KeyRepeatBridge`], which yields to the widget's buttons.
//!
//! # Threading
//!
//! Every model is `Send + Sync`, but the system is meant to be driven from a
//! single run-loop. No lock is held while listeners or timer callbacks run, so
//! a listener may feed more input, interrupt, or dispose the model that called
//! it.

mod events;
mod interaction;
mod key_repeat;
mod tracker;
pub mod widgets;

pub use events::{ButtonInput, Key, PointerKind};
pub use interaction::{InteractionState, resolve as resolve_interaction_state};
pub use key_repeat::{KeyRepeatBridge, KeyRepeatOptions};
pub use tracker::{ButtonSignals, InteractionSignalTracker};
