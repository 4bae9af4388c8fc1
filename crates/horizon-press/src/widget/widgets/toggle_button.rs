//! Two-value toggle switch model.
//!
//! [`ToggleButtonModel`] is a [`PushButtonModel`] whose every fire flips an
//! external value holder between `value_off` and `value_on`. Unlike
//! [`StickyToggleButtonModel`](super::StickyToggleButtonModel) it does not
//! latch: one click turns it on, the next click turns it off.

use std::fmt;
use std::sync::{Arc, Weak};

use horizon_press_core::logging::targets;
use horizon_press_core::{ConnectionId, Property, Signal};
use parking_lot::Mutex;

use super::push_button::{PushButtonModel, PushButtonOptions};
use super::ButtonValue;
use crate::error::{ButtonError, Result};

/// A switch that flips between two values on each fire.
pub struct ToggleButtonModel<T: ButtonValue> {
    push: Arc<PushButtonModel>,
    value_off: T,
    value_on: T,
    value: Arc<Property<T>>,
    fire_link: Mutex<Option<ConnectionId>>,

    /// Emitted with the new value after every toggle.
    pub toggled: Signal<T>,
}

impl<T: ButtonValue> ToggleButtonModel<T> {
    /// Create a toggle bound to `value`.
    ///
    /// `options` configures the underlying push button (fire on down, enabled
    /// property). Fails if the two values compare equal or `value` holds
    /// neither.
    pub fn new(
        value_off: T,
        value_on: T,
        value: Arc<Property<T>>,
        options: PushButtonOptions,
    ) -> Result<Arc<Self>> {
        if value_off == value_on {
            return Err(ButtonError::IndistinctValues {
                value: format!("{value_off:?}"),
            });
        }
        let current = value.get();
        if current != value_off && current != value_on {
            return Err(ButtonError::ValueOutOfRange {
                value: format!("{current:?}"),
            });
        }

        let push = PushButtonModel::new(options);
        Ok(Arc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let link = push.fired.connect(move |_| {
                if let Some(model) = weak.upgrade() {
                    model.toggle();
                }
            });

            Self {
                push,
                value_off,
                value_on,
                value,
                fire_link: Mutex::new(Some(link)),
                toggled: Signal::new(),
            }
        }))
    }

    /// The push button that drives this toggle.
    pub fn push_button(&self) -> &Arc<PushButtonModel> {
        &self.push
    }

    /// Whether the holder is at `value_on`.
    pub fn is_on(&self) -> bool {
        self.value.with(|value| *value == self.value_on)
    }

    /// Flip the holder to the other value.
    pub fn toggle(&self) {
        let current = self.value.get();
        debug_assert!(
            current == self.value_off || current == self.value_on,
            "toggle value {current:?} is neither {:?} nor {:?}",
            self.value_off,
            self.value_on
        );

        let next = if current == self.value_on {
            self.value_off.clone()
        } else {
            self.value_on.clone()
        };
        self.value.set(next.clone());
        tracing::debug!(target: targets::BUTTON, value = ?next, "toggle switched");
        self.toggled.emit(next);
    }

    /// Detach from the push button and dispose it.
    pub fn dispose(&self) {
        if let Some(link) = self.fire_link.lock().take() {
            self.push.fired.disconnect(link);
        }
        self.push.dispose();
        self.toggled.disconnect_all();
    }
}

impl<T: ButtonValue> Drop for ToggleButtonModel<T> {
    fn drop(&mut self) {
        if let Some(link) = self.fire_link.get_mut().take() {
            self.push.fired.disconnect(link);
        }
    }
}

impl<T: ButtonValue> fmt::Debug for ToggleButtonModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleButtonModel")
            .field("value_off", &self.value_off)
            .field("value_on", &self.value_on)
            .field("value", &self.value)
            .finish()
    }
}

static_assertions::assert_impl_all!(ToggleButtonModel<bool>: Send, Sync);
