//! Number spinner model.
//!
//! [`NumberSpinnerModel`] steps an integer property up and down through a pair
//! of arrow buttons. Both buttons fire on press and repeat while held, each is
//! disabled at its end of the range, and the arrow keys repeat through a
//! [`KeyRepeatBridge`] that defers to the buttons while either is held.
//!
//! # Example
//!
//! ```
//! use horizon_press::widget::PointerKind;
//! use horizon_press::widget::widgets::{NumberSpinnerModel, NumberSpinnerOptions};
//! use horizon_press_core::{Property, TimerQueue};
//! use std::time::Duration;
//!
//! let timers = TimerQueue::shared();
//! let value = Property::shared(0);
//! let spinner = NumberSpinnerModel::new(
//!     timers.clone(),
//!     value.clone(),
//!     Property::shared(true),
//!     NumberSpinnerOptions::default().with_range(0..=10),
//! )?;
//!
//! let up = spinner.increment_button().button();
//! up.pointer_enter(PointerKind::Mouse);
//! up.pointer_down(PointerKind::Mouse);
//! timers.advance(Duration::from_millis(650));
//! up.pointer_up();
//!
//! // One step on press, then at 400, 500 and 600 ms.
//! assert_eq!(value.get(), 4);
//! # Ok::<(), horizon_press::ButtonError>(())
//! ```

use std::fmt;
use std::ops::RangeInclusive;
use std::sync::{Arc, Weak};

use horizon_press_core::logging::targets;
use horizon_press_core::{ConnectionId, Property, RepeatTimerOptions, TimerQueue};
use parking_lot::Mutex;

use super::push_button::{PushButtonModel, PushButtonOptions};
use crate::error::{ButtonError, Result};
use crate::widget::{Key, KeyRepeatBridge, KeyRepeatOptions};

/// Keys that step the value up.
const INCREMENT_KEYS: [Key; 2] = [Key::ArrowUp, Key::ArrowRight];

/// Keys that step the value down.
const DECREMENT_KEYS: [Key; 2] = [Key::ArrowDown, Key::ArrowLeft];

/// Configuration for a [`NumberSpinnerModel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberSpinnerOptions {
    /// Allowed values, inclusive.
    pub range: RangeInclusive<i64>,
    /// Amount added or subtracted per fire.
    pub delta: i64,
    /// Hold-to-repeat timing for both buttons and the arrow keys.
    pub timing: RepeatTimerOptions,
}

impl NumberSpinnerOptions {
    /// Set the allowed range.
    pub fn with_range(mut self, range: RangeInclusive<i64>) -> Self {
        self.range = range;
        self
    }

    /// Set the step size.
    pub fn with_delta(mut self, delta: i64) -> Self {
        self.delta = delta;
        self
    }

    /// Set the repeat timing.
    pub fn with_timing(mut self, timing: RepeatTimerOptions) -> Self {
        self.timing = timing;
        self
    }
}

impl Default for NumberSpinnerOptions {
    fn default() -> Self {
        Self {
            range: 0..=100,
            delta: 1,
            timing: RepeatTimerOptions::default(),
        }
    }
}

#[derive(Default)]
struct SpinnerLinks {
    value: Option<ConnectionId>,
    enabled: Option<ConnectionId>,
    increment: Option<ConnectionId>,
    decrement: Option<ConnectionId>,
    keyboard: Option<ConnectionId>,
}

/// An integer value with increment and decrement buttons.
pub struct NumberSpinnerModel {
    value: Arc<Property<i64>>,
    range: RangeInclusive<i64>,
    delta: i64,
    enabled: Arc<Property<bool>>,
    increment_enabled: Arc<Property<bool>>,
    decrement_enabled: Arc<Property<bool>>,
    increment: Arc<PushButtonModel>,
    decrement: Arc<PushButtonModel>,
    keyboard: Arc<KeyRepeatBridge>,
    links: Mutex<SpinnerLinks>,
}

impl NumberSpinnerModel {
    /// Create a spinner over `value`.
    ///
    /// Fails if the range is empty, the delta is not positive, or `value` is
    /// outside the range.
    pub fn new(
        timers: Arc<TimerQueue>,
        value: Arc<Property<i64>>,
        enabled: Arc<Property<bool>>,
        options: NumberSpinnerOptions,
    ) -> Result<Arc<Self>> {
        let NumberSpinnerOptions {
            range,
            delta,
            timing,
        } = options;

        if range.is_empty() {
            return Err(ButtonError::EmptyRange {
                start: *range.start(),
                end: *range.end(),
            });
        }
        if delta <= 0 {
            return Err(ButtonError::InvalidDelta { delta });
        }
        let current = value.get();
        if !range.contains(&current) {
            return Err(ButtonError::ValueOutOfRange {
                value: current.to_string(),
            });
        }

        let is_enabled = enabled.get();
        let increment_enabled = Property::shared(is_enabled && current < *range.end());
        let decrement_enabled = Property::shared(is_enabled && current > *range.start());

        let arrow_options = |enabled: &Arc<Property<bool>>| {
            PushButtonOptions::default()
                .with_fire_on_down(true)
                .with_hold_to_repeat(timers.clone(), timing)
                .with_enabled(enabled.clone())
        };
        let increment = PushButtonModel::new(arrow_options(&increment_enabled));
        let decrement = PushButtonModel::new(arrow_options(&decrement_enabled));

        let keyboard = KeyRepeatBridge::new(
            timers.clone(),
            KeyRepeatOptions::new(INCREMENT_KEYS.into_iter().chain(DECREMENT_KEYS)).with_timing(timing),
            vec![increment.button().clone(), decrement.button().clone()],
        );

        Ok(Arc::new_cyclic(|weak: &Weak<Self>| {
            let on_value = weak.clone();
            let value_link = value.lazy_link(move |_| {
                if let Some(spinner) = on_value.upgrade() {
                    spinner.update_button_enabled();
                }
            });

            let on_enabled = weak.clone();
            let enabled_link = enabled.lazy_link(move |_| {
                if let Some(spinner) = on_enabled.upgrade() {
                    spinner.update_button_enabled();
                }
            });

            let on_increment = weak.clone();
            let increment_link = increment.fired.connect(move |_| {
                if let Some(spinner) = on_increment.upgrade() {
                    spinner.step(delta);
                }
            });

            let on_decrement = weak.clone();
            let decrement_link = decrement.fired.connect(move |_| {
                if let Some(spinner) = on_decrement.upgrade() {
                    spinner.step(-delta);
                }
            });

            let on_key = weak.clone();
            let keyboard_link = keyboard.fired.connect(move |&key| {
                if let Some(spinner) = on_key.upgrade() {
                    spinner.on_key_fired(key);
                }
            });

            Self {
                value,
                range,
                delta,
                enabled,
                increment_enabled,
                decrement_enabled,
                increment,
                decrement,
                keyboard,
                links: Mutex::new(SpinnerLinks {
                    value: Some(value_link),
                    enabled: Some(enabled_link),
                    increment: Some(increment_link),
                    decrement: Some(decrement_link),
                    keyboard: Some(keyboard_link),
                }),
            }
        }))
    }

    /// The bound value.
    pub fn value(&self) -> &Arc<Property<i64>> {
        &self.value
    }

    pub fn range(&self) -> &RangeInclusive<i64> {
        &self.range
    }

    pub fn delta(&self) -> i64 {
        self.delta
    }

    /// The up arrow. Feed its pointer input through `.button()`.
    pub fn increment_button(&self) -> &Arc<PushButtonModel> {
        &self.increment
    }

    /// The down arrow.
    pub fn decrement_button(&self) -> &Arc<PushButtonModel> {
        &self.decrement
    }

    /// The arrow-key repeat driver.
    pub fn key_repeat(&self) -> &Arc<KeyRepeatBridge> {
        &self.keyboard
    }

    /// Handle a key press while the spinner has focus.
    ///
    /// Returns whether the key was handled.
    pub fn key_down(&self, key: Key) -> bool {
        if !self.enabled.get() {
            return false;
        }
        self.keyboard.key_down(key)
    }

    /// Handle a key release.
    pub fn key_up(&self, key: Key) -> bool {
        self.keyboard.key_up(key)
    }

    /// Handle focus loss.
    pub fn blur(&self) {
        self.keyboard.blur();
    }

    /// Release every subscription and dispose the buttons and key repeat.
    pub fn dispose(&self) {
        let links = std::mem::take(&mut *self.links.lock());
        if let Some(id) = links.value {
            self.value.unlink(id);
        }
        if let Some(id) = links.enabled {
            self.enabled.unlink(id);
        }
        if let Some(id) = links.increment {
            self.increment.fired.disconnect(id);
        }
        if let Some(id) = links.decrement {
            self.decrement.fired.disconnect(id);
        }
        if let Some(id) = links.keyboard {
            self.keyboard.fired.disconnect(id);
        }
        self.keyboard.dispose();
        self.increment.dispose();
        self.decrement.dispose();
        tracing::trace!(target: targets::BUTTON, "number spinner disposed");
    }

    fn step(&self, delta: i64) {
        let current = self.value.get();
        let next = current
            .saturating_add(delta)
            .clamp(*self.range.start(), *self.range.end());
        if self.value.set(next) {
            tracing::debug!(target: targets::BUTTON, from = current, to = next, "spinner stepped");
        }
    }

    fn on_key_fired(&self, key: Key) {
        if INCREMENT_KEYS.contains(&key) {
            self.increment.fire();
        } else if DECREMENT_KEYS.contains(&key) {
            self.decrement.fire();
        }
    }

    fn update_button_enabled(&self) {
        let enabled = self.enabled.get();
        let current = self.value.get();
        self.increment_enabled
            .set(enabled && current < *self.range.end());
        self.decrement_enabled
            .set(enabled && current > *self.range.start());
    }
}

impl Drop for NumberSpinnerModel {
    fn drop(&mut self) {
        let links = self.links.get_mut();
        if let Some(id) = links.value.take() {
            self.value.unlink(id);
        }
        if let Some(id) = links.enabled.take() {
            self.enabled.unlink(id);
        }
    }
}

impl fmt::Debug for NumberSpinnerModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumberSpinnerModel")
            .field("value", &self.value.get())
            .field("range", &self.range)
            .field("delta", &self.delta)
            .field("keyboard", &self.keyboard)
            .finish()
    }
}

static_assertions::assert_impl_all!(NumberSpinnerModel: Send, Sync);
