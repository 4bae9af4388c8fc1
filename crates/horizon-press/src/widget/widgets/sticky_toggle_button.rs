//! Sticky toggle button model.
//!
//! A sticky toggle latches down when pressed and pops back up on the release
//! that completes the *next* press. It is bound to an external value holder
//! that may only take `value_up` or `value_down`; the model writes the holder
//! when the user toggles and follows it when something else does.
//!
//! # Toggle Protocol
//!
//! - Pressing while up writes `value_down` immediately.
//! - The release that ends that same press only arms the button.
//! - The next press-and-release, finishing over (or focused) and not
//!   interrupted, writes `value_up`.
//!
//! The holder is mirrored into the button's `down` signal: while it holds
//! `value_down` the [`ButtonModel`] is latched down, whoever wrote the value.
//! Press and release decisions look at `held`, so the mirror never toggles.
//!
//! Setting the holder to `value_down` from outside arms the button too, so a
//! programmatically latched button pops up on the first click.
//!
//! # Example
//!
//! ```
//! use horizon_press::widget::{InteractionState, PointerKind};
//! use horizon_press::widget::widgets::StickyToggleButtonModel;
//! use horizon_press_core::Property;
//!
//! let value = Property::shared("off");
//! let sticky = StickyToggleButtonModel::new("off", "on", value.clone(), Property::shared(true))?;
//!
//! let button = sticky.button();
//! button.pointer_enter(PointerKind::Mouse);
//! button.pointer_down(PointerKind::Mouse);
//! button.pointer_up();
//! assert_eq!(value.get(), "on");
//!
//! button.pointer_down(PointerKind::Mouse);
//! button.pointer_up();
//! assert_eq!(value.get(), "off");
//!
//! value.set("on");
//! button.pointer_exit();
//! assert_eq!(sticky.state(), InteractionState::Pressed);
//! # Ok::<(), horizon_press::ButtonError>(())
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use horizon_press_core::logging::targets;
use horizon_press_core::{ConnectionId, Property, ReadOnlyProperty, Signal};
use parking_lot::Mutex;

use super::button_model::{ButtonModel, ButtonTransition};
use super::{ButtonValue, ResetOnDrop};
use crate::error::{ButtonError, Result};
use crate::widget::{InteractionState, resolve_interaction_state};

/// A two-value button that stays down until pressed again.
pub struct StickyToggleButtonModel<T: ButtonValue> {
    button: Arc<ButtonModel>,
    value_up: T,
    value_down: T,
    value: Arc<Property<T>>,
    /// Arms the next release to pop the button up.
    pressed_while_down: AtomicBool,
    /// Set while this model writes `value`, so its own writes do not arm.
    self_toggling: AtomicBool,
    disposed: AtomicBool,
    state: Arc<Property<InteractionState>>,
    transition_link: Mutex<Option<ConnectionId>>,
    value_link: Mutex<Option<ConnectionId>>,

    /// Emitted with the new value after every user toggle.
    pub toggled: Signal<T>,
    /// Emitted after `toggled`, once the toggle is complete.
    pub fire_complete: Signal<()>,
}

impl<T: ButtonValue> StickyToggleButtonModel<T> {
    /// Create a sticky toggle bound to `value`.
    ///
    /// Fails if the two values compare equal or `value` currently holds
    /// neither of them.
    pub fn new(
        value_up: T,
        value_down: T,
        value: Arc<Property<T>>,
        enabled: Arc<Property<bool>>,
    ) -> Result<Arc<Self>> {
        if value_up == value_down {
            return Err(ButtonError::IndistinctValues {
                value: format!("{value_up:?}"),
            });
        }
        let current = value.get();
        if current != value_up && current != value_down {
            return Err(ButtonError::ValueOutOfRange {
                value: format!("{current:?}"),
            });
        }

        let button = ButtonModel::new(enabled);
        let is_down = current == value_down;
        button.set_latched(is_down);

        Ok(Arc::new_cyclic(|weak: &Weak<Self>| {
            let transition_weak = weak.clone();
            let transition_link = button.transitions.connect(move |transition| {
                if let Some(model) = transition_weak.upgrade() {
                    model.on_transition(transition);
                }
            });

            let value_weak = weak.clone();
            let value_link = value.lazy_link(move |new_value| {
                if let Some(model) = value_weak.upgrade() {
                    model.on_value_changed(new_value);
                }
            });

            Self {
                state: Property::shared(resolve_interaction_state(&button.signals(), is_down)),
                button,
                value_up,
                value_down,
                value,
                pressed_while_down: AtomicBool::new(true),
                self_toggling: AtomicBool::new(false),
                disposed: AtomicBool::new(false),
                transition_link: Mutex::new(Some(transition_link)),
                value_link: Mutex::new(Some(value_link)),
                toggled: Signal::new(),
                fire_complete: Signal::new(),
            }
        }))
    }

    /// The underlying button signals. Feed input here.
    pub fn button(&self) -> &Arc<ButtonModel> {
        &self.button
    }

    pub fn value_up(&self) -> &T {
        &self.value_up
    }

    pub fn value_down(&self) -> &T {
        &self.value_down
    }

    /// Whether the holder is at `value_down`.
    pub fn is_down(&self) -> bool {
        self.value.with(|value| *value == self.value_down)
    }

    /// Whether the next qualifying release will pop the button up.
    pub fn is_armed(&self) -> bool {
        self.pressed_while_down.load(Ordering::SeqCst)
    }

    /// Current appearance.
    pub fn state(&self) -> InteractionState {
        self.state.get()
    }

    /// Appearance, for renderers to link to.
    pub fn interaction_state(&self) -> ReadOnlyProperty<InteractionState> {
        ReadOnlyProperty::new(self.state.clone())
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Release the value and button subscriptions and drop all listeners.
    ///
    /// The value holder keeps whatever value it has.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(link) = self.transition_link.lock().take() {
            self.button.transitions.disconnect(link);
        }
        self.unlink_value();
        self.button.dispose();
        self.toggled.disconnect_all();
        self.fire_complete.disconnect_all();
        tracing::trace!(target: targets::BUTTON, "sticky toggle disposed");
    }

    fn unlink_value(&self) {
        if let Some(link) = self.value_link.lock().take() {
            self.value.unlink(link);
        }
    }

    fn refresh_state(&self) {
        self.state
            .set(resolve_interaction_state(&self.button.signals(), self.is_down()));
    }

    fn on_transition(&self, transition: &ButtonTransition) {
        self.refresh_state();

        if transition.reenabled() {
            self.pressed_while_down.store(true, Ordering::SeqCst);
        }

        if transition.pressed() {
            if transition.after.enabled && self.value.with(|value| *value == self.value_up) {
                // Disarm before writing: the write notifies listeners that may
                // release the button re-entrantly.
                self.pressed_while_down.store(false, Ordering::SeqCst);
                self.toggle(self.value_down.clone());
            }
        } else if transition.released() && self.is_down() {
            let after = transition.after;
            if self.is_armed()
                && (after.over || after.focused)
                && after.enabled
                && !after.interrupted
            {
                self.toggle(self.value_up.clone());
            }
            self.pressed_while_down.store(true, Ordering::SeqCst);
        }
    }

    fn toggle(&self, new_value: T) {
        {
            self.self_toggling.store(true, Ordering::SeqCst);
            let _reset = ResetOnDrop(&self.self_toggling);
            self.value.set(new_value.clone());
        }
        tracing::debug!(target: targets::BUTTON, value = ?new_value, "sticky toggle");
        self.toggled.emit(new_value);
        self.fire_complete.emit(());
    }

    fn on_value_changed(&self, new_value: &T) {
        let valid = *new_value == self.value_up || *new_value == self.value_down;
        debug_assert!(
            valid,
            "sticky toggle value {new_value:?} is neither {:?} nor {:?}",
            self.value_up, self.value_down
        );
        if !valid {
            horizon_press_core::press_error!(
                value = ?new_value,
                "sticky toggle value outside its pair, ignoring"
            );
        } else if *new_value == self.value_down && !self.self_toggling.load(Ordering::SeqCst) {
            self.pressed_while_down.store(true, Ordering::SeqCst);
        }
        self.button.set_latched(valid && *new_value == self.value_down);
        self.refresh_state();
    }
}

impl<T: ButtonValue> Drop for StickyToggleButtonModel<T> {
    fn drop(&mut self) {
        if let Some(link) = self.transition_link.get_mut().take() {
            self.button.transitions.disconnect(link);
        }
        if let Some(link) = self.value_link.get_mut().take() {
            self.value.unlink(link);
        }
    }
}

impl<T: ButtonValue> fmt::Debug for StickyToggleButtonModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StickyToggleButtonModel")
            .field("value_up", &self.value_up)
            .field("value_down", &self.value_down)
            .field("value", &self.value)
            .field("pressed_while_down", &self.pressed_while_down)
            .finish()
    }
}

static_assertions::assert_impl_all!(StickyToggleButtonModel<String>: Send, Sync);
