//! Radio button model.
//!
//! A [`RadioButtonModel`] represents one choice of a shared selection
//! property. Firing selects its own value; it looks pressed whenever its value
//! is the selected one, however that selection came about.
//!
//! Members are normally created and owned by a
//! [`RadioButtonGroup`](super::RadioButtonGroup).

use std::fmt;
use std::sync::{Arc, Weak};

use horizon_press_core::logging::targets;
use horizon_press_core::{ConnectionId, Property, ReadOnlyProperty, Signal};
use parking_lot::Mutex;

use super::push_button::{PushButtonModel, PushButtonOptions};
use super::ButtonValue;
use crate::widget::{InteractionState, resolve_interaction_state};

/// One member of an exclusive selection.
pub struct RadioButtonModel<T: ButtonValue> {
    push: Arc<PushButtonModel>,
    value: T,
    selection: Arc<Property<T>>,
    state: Arc<Property<InteractionState>>,
    links: Mutex<Links>,

    /// Emitted with this member's value when the user selects it.
    pub selected: Signal<T>,
}

#[derive(Default)]
struct Links {
    transition: Option<ConnectionId>,
    fired: Option<ConnectionId>,
    selection: Option<ConnectionId>,
}

impl<T: ButtonValue> RadioButtonModel<T> {
    /// Create a member that writes `value` to `selection` when fired.
    pub fn new(value: T, selection: Arc<Property<T>>, enabled: Arc<Property<bool>>) -> Arc<Self> {
        let push = PushButtonModel::new(PushButtonOptions::default().with_enabled(enabled));
        let is_selected = selection.with(|current| *current == value);

        Arc::new_cyclic(|weak: &Weak<Self>| {
            let transition_weak = weak.clone();
            let transition = push.button().transitions.connect(move |_| {
                if let Some(model) = transition_weak.upgrade() {
                    model.refresh_state();
                }
            });

            let fired_weak = weak.clone();
            let fired = push.fired.connect(move |_| {
                if let Some(model) = fired_weak.upgrade() {
                    model.select();
                }
            });

            let selection_weak = weak.clone();
            let selection_link = selection.lazy_link(move |_| {
                if let Some(model) = selection_weak.upgrade() {
                    model.refresh_state();
                }
            });

            Self {
                state: Property::shared(resolve_interaction_state(
                    &push.button().signals(),
                    is_selected,
                )),
                push,
                value,
                selection,
                links: Mutex::new(Links {
                    transition: Some(transition),
                    fired: Some(fired),
                    selection: Some(selection_link),
                }),
                selected: Signal::new(),
            }
        })
    }

    /// The push button that drives this member.
    pub fn push_button(&self) -> &Arc<PushButtonModel> {
        &self.push
    }

    /// The value this member selects.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Whether this member's value is the selected one.
    pub fn is_selected(&self) -> bool {
        self.selection.with(|current| *current == self.value)
    }

    /// Make this member's value the selection.
    ///
    /// Returns `false` if it already was.
    pub fn select(&self) -> bool {
        if !self.selection.set(self.value.clone()) {
            return false;
        }
        tracing::debug!(target: targets::BUTTON, value = ?self.value, "radio button selected");
        self.selected.emit(self.value.clone());
        true
    }

    /// Current appearance.
    pub fn state(&self) -> InteractionState {
        self.state.get()
    }

    /// Appearance, for renderers to link to.
    pub fn interaction_state(&self) -> ReadOnlyProperty<InteractionState> {
        ReadOnlyProperty::new(self.state.clone())
    }

    /// Release all subscriptions and dispose the push button.
    pub fn dispose(&self) {
        let links = std::mem::take(&mut *self.links.lock());
        if let Some(id) = links.transition {
            self.push.button().transitions.disconnect(id);
        }
        if let Some(id) = links.fired {
            self.push.fired.disconnect(id);
        }
        if let Some(id) = links.selection {
            self.selection.unlink(id);
        }
        self.push.dispose();
        self.selected.disconnect_all();
    }

    fn refresh_state(&self) {
        self.state.set(resolve_interaction_state(
            &self.push.button().signals(),
            self.is_selected(),
        ));
    }
}

impl<T: ButtonValue> Drop for RadioButtonModel<T> {
    fn drop(&mut self) {
        let links = std::mem::take(self.links.get_mut());
        if let Some(id) = links.transition {
            self.push.button().transitions.disconnect(id);
        }
        if let Some(id) = links.fired {
            self.push.fired.disconnect(id);
        }
        if let Some(id) = links.selection {
            self.selection.unlink(id);
        }
    }
}

impl<T: ButtonValue> fmt::Debug for RadioButtonModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RadioButtonModel")
            .field("value", &self.value)
            .field("selected", &self.is_selected())
            .field("state", &self.state())
            .finish()
    }
}

static_assertions::assert_impl_all!(RadioButtonModel<u32>: Send, Sync);
