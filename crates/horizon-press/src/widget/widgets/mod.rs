//! Button models for Horizon Press.
//!
//! This module provides the firing models built on [`ButtonModel`]:
//!
//! - [`PushButtonModel`]: Fires on release, on press, or while held
//! - [`StickyToggleButtonModel`]: Latches down, pops up on the next press
//! - [`ToggleButtonModel`]: Flips a two-value holder on every fire
//! - [`RadioButtonModel`] / [`RadioButtonGroup`]: Exclusive selection
//! - [`NumberSpinnerModel`]: Increment/decrement with hold and arrow-key repeat

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

mod button_model;
mod number_spinner;
mod push_button;
mod radio_button;
mod radio_group;
mod sticky_toggle_button;
mod toggle_button;

pub use button_model::{ButtonModel, ButtonTransition};
pub use number_spinner::{NumberSpinnerModel, NumberSpinnerOptions};
pub use push_button::{HoldToRepeat, PushButtonModel, PushButtonOptions};
pub use radio_button::RadioButtonModel;
pub use radio_group::RadioButtonGroup;
pub use sticky_toggle_button::StickyToggleButtonModel;
pub use toggle_button::ToggleButtonModel;

/// Values a button can write to its holder.
pub trait ButtonValue: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {}

impl<T> ButtonValue for T where T: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {}

/// Clears a flag when dropped, including during unwinding.
struct ResetOnDrop<'a>(&'a AtomicBool);

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
