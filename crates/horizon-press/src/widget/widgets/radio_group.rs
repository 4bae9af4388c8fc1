//! Radio button group.
//!
//! [`RadioButtonGroup`] creates one [`RadioButtonModel`] per value over a
//! single shared selection property, so exclusivity comes for free: exactly
//! one member's value is ever the selection.
//!
//! # Keyboard Navigation
//!
//! With the group focused, the arrow keys move the selection to the next or
//! previous member, wrapping at either end. Home and End jump to the first and
//! last member.
//!
//! # Example
//!
//! ```
//! use horizon_press::widget::Key;
//! use horizon_press::widget::widgets::RadioButtonGroup;
//! use horizon_press_core::Property;
//!
//! let selection = Property::shared("small");
//! let group = RadioButtonGroup::new(
//!     selection.clone(),
//!     vec!["small", "medium", "large"],
//!     Property::shared(true),
//! )?;
//!
//! group.handle_key(Key::ArrowRight);
//! assert_eq!(selection.get(), "medium");
//!
//! group.handle_key(Key::ArrowLeft);
//! group.handle_key(Key::ArrowLeft);
//! assert_eq!(selection.get(), "large");
//! # Ok::<(), horizon_press::ButtonError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use horizon_press_core::Property;
use horizon_press_core::logging::targets;

use super::ButtonValue;
use super::radio_button::RadioButtonModel;
use crate::error::{ButtonError, Result};
use crate::widget::Key;

/// A set of radio buttons sharing one selection.
pub struct RadioButtonGroup<T: ButtonValue> {
    selection: Arc<Property<T>>,
    enabled: Arc<Property<bool>>,
    members: Vec<Arc<RadioButtonModel<T>>>,
}

impl<T: ButtonValue> RadioButtonGroup<T> {
    /// Create a group with one member per value, in order.
    ///
    /// Fails if two values compare equal or the selection holds none of them.
    pub fn new(
        selection: Arc<Property<T>>,
        values: Vec<T>,
        enabled: Arc<Property<bool>>,
    ) -> Result<Self> {
        for (i, value) in values.iter().enumerate() {
            if values[i + 1..].contains(value) {
                return Err(ButtonError::IndistinctValues {
                    value: format!("{value:?}"),
                });
            }
        }
        let current = selection.get();
        if !values.contains(&current) {
            return Err(ButtonError::ValueOutOfRange {
                value: format!("{current:?}"),
            });
        }

        let members = values
            .into_iter()
            .map(|value| RadioButtonModel::new(value, selection.clone(), enabled.clone()))
            .collect();

        Ok(Self {
            selection,
            enabled,
            members,
        })
    }

    /// The shared selection property.
    pub fn selection(&self) -> &Arc<Property<T>> {
        &self.selection
    }

    /// All members, in order.
    pub fn members(&self) -> &[Arc<RadioButtonModel<T>>] {
        &self.members
    }

    /// The member at `index`.
    pub fn member(&self, index: usize) -> Option<&Arc<RadioButtonModel<T>>> {
        self.members.get(index)
    }

    /// Get the number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the group has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Index of the selected member.
    pub fn selected_index(&self) -> Option<usize> {
        self.members.iter().position(|member| member.is_selected())
    }

    /// Select the member at `index`.
    ///
    /// Returns `false` if the index is out of range or already selected.
    pub fn select_index(&self, index: usize) -> bool {
        self.members.get(index).is_some_and(|member| member.select())
    }

    /// Move the selection in response to a key press.
    ///
    /// Returns whether the key was handled. Keys are ignored while the group
    /// is disabled.
    pub fn handle_key(&self, key: Key) -> bool {
        let count = self.members.len();
        if count == 0 || !self.enabled.get() {
            return false;
        }

        let current = self.selected_index().unwrap_or(0);
        let target = match key {
            Key::ArrowRight | Key::ArrowDown => (current + 1) % count,
            Key::ArrowLeft | Key::ArrowUp => (current + count - 1) % count,
            Key::Home => 0,
            Key::End => count - 1,
            _ => return false,
        };

        tracing::trace!(target: targets::KEYBOARD, ?key, current, target, "radio group navigation");
        self.select_index(target);
        true
    }

    /// Cancel any press on any member.
    pub fn interrupt_all(&self) {
        for member in &self.members {
            member.push_button().button().interrupt();
        }
    }

    /// Dispose every member.
    pub fn dispose(&self) {
        for member in &self.members {
            member.dispose();
        }
    }
}

impl<T: ButtonValue> fmt::Debug for RadioButtonGroup<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RadioButtonGroup")
            .field("selection", &self.selection)
            .field("members", &self.members.len())
            .finish()
    }
}

static_assertions::assert_impl_all!(RadioButtonGroup<u32>: Send, Sync);
