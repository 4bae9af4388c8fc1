//! Input aggregation for a single button.
//!
//! [`InteractionSignalTracker`] folds raw [`ButtonInput`] events into the
//! normalized `{over, down, focused}` triple plus the touch-aware "looks"
//! signals used for appearance. It is a plain state machine with no locking
//! and no notifications; [`ButtonModel`](super::widgets::ButtonModel) wraps it
//! and publishes the transitions.
//!
//! # Transitions
//!
//! | Input | Effect |
//! |-------|--------|
//! | `PointerEnter(kind)` | `over = true` |
//! | `PointerExit` | `over = false`, a captured press stays down |
//! | `PointerDown(kind)` while over, enabled and up | `down = true`, `interrupted = false` |
//! | `PointerUp` | ends a pointer press |
//! | `PointerCancel` | interrupts a pointer press |
//! | `FocusIn` / `FocusOut` | toggles `focused`, losing focus interrupts a keyboard press |
//! | `KeyDown(Space \| Enter)` while focused, enabled and up | keyboard press |
//! | `KeyUp(key)` of the pressing key | ends the keyboard press |
//!
//! Stateful buttons can also be *latched* down by their model through
//! [`set_latched`](InteractionSignalTracker::set_latched), for example when a
//! sticky toggle's value is set to its down value from outside. `down` is then
//! true with no pointer or key holding it; `held` tells the two apart, and
//! press/release decisions key off `held` only.
//!
//! A lifted finger no longer hovers anything. That is applied by
//! [`settle`](InteractionSignalTracker::settle) as a separate step, so the
//! release itself is still decided with the finger over the button.

use super::events::{ButtonInput, Key, PointerKind};

/// A snapshot of every signal a button exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonSignals {
    /// Input is accepted and firing allowed.
    pub enabled: bool,
    /// A pointer is over the hit region.
    pub over: bool,
    /// The button is down: held, or latched by its model.
    pub down: bool,
    /// A pointer or key is holding the button down right now.
    pub held: bool,
    /// The model has latched the button down.
    pub latched: bool,
    /// The button has keyboard focus.
    pub focused: bool,
    /// Over, as it should look: touch hover only counts while pressed.
    pub looks_over: bool,
    /// Pressed, as it should look: a pointer press dragged off looks released.
    pub looks_pressed: bool,
    /// The current interaction was cancelled and may not fire.
    pub interrupted: bool,
}

/// What is holding the button down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressSource {
    Pointer(PointerKind),
    Keyboard(Key),
}

/// Aggregates raw input into button signals.
#[derive(Debug, Clone)]
pub struct InteractionSignalTracker {
    enabled: bool,
    over: bool,
    hover_kind: Option<PointerKind>,
    focused: bool,
    press: Option<PressSource>,
    latched: bool,
    interrupted: bool,
    /// A finger was lifted; clear touch hover on the next `settle()`.
    touch_lifted: bool,
}

impl InteractionSignalTracker {
    /// Create a tracker with nothing over, down or focused.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            over: false,
            hover_kind: None,
            focused: false,
            press: None,
            latched: false,
            interrupted: false,
            touch_lifted: false,
        }
    }

    /// Current signal values.
    pub fn signals(&self) -> ButtonSignals {
        ButtonSignals {
            enabled: self.enabled,
            over: self.over,
            down: self.is_down(),
            held: self.is_held(),
            latched: self.latched,
            focused: self.focused,
            looks_over: self.looks_over(),
            looks_pressed: self.looks_pressed(),
            interrupted: self.interrupted,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn is_down(&self) -> bool {
        self.is_held() || self.latched
    }

    pub fn is_held(&self) -> bool {
        self.press.is_some()
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    /// Whether the current press comes from the keyboard.
    pub fn is_keyboard_press(&self) -> bool {
        matches!(self.press, Some(PressSource::Keyboard(_)))
    }

    /// Over, unless the only thing over the button is an unpressed finger.
    pub fn looks_over(&self) -> bool {
        let hover_capable = self.hover_kind.is_none_or(PointerKind::can_hover);
        self.over && (hover_capable || self.is_held())
    }

    /// Down, and either the pointer is still over or the keyboard pressed it.
    pub fn looks_pressed(&self) -> bool {
        self.is_down() && (self.over || self.is_keyboard_press())
    }

    /// Apply one raw input. Returns whether any signal changed.
    pub fn apply(&mut self, input: ButtonInput) -> bool {
        let before = self.signals();
        match input {
            ButtonInput::PointerEnter(kind) => {
                self.hover_kind = Some(kind);
                self.over = true;
            }
            ButtonInput::PointerExit => {
                self.hover_kind = None;
                self.over = false;
            }
            ButtonInput::PointerDown(kind) => {
                if self.over && self.enabled && !self.is_held() {
                    self.hover_kind = Some(kind);
                    self.press = Some(PressSource::Pointer(kind));
                    self.interrupted = false;
                }
            }
            ButtonInput::PointerUp => {
                if matches!(self.press, Some(PressSource::Pointer(_))) {
                    self.press = None;
                }
                if self.hover_kind == Some(PointerKind::Touch) {
                    self.touch_lifted = true;
                }
            }
            ButtonInput::PointerCancel => {
                if matches!(self.press, Some(PressSource::Pointer(_))) {
                    self.interrupt();
                }
                if self.hover_kind == Some(PointerKind::Touch) {
                    self.hover_kind = None;
                    self.over = false;
                }
            }
            ButtonInput::FocusIn => {
                self.focused = true;
            }
            ButtonInput::FocusOut => {
                self.focused = false;
                if self.is_keyboard_press() {
                    self.interrupt();
                }
            }
            ButtonInput::KeyDown(key) => {
                if key.is_activation() && self.focused && self.enabled && !self.is_held() {
                    self.press = Some(PressSource::Keyboard(key));
                    self.interrupted = false;
                }
            }
            ButtonInput::KeyUp(key) => {
                if self.press == Some(PressSource::Keyboard(key)) {
                    self.press = None;
                }
            }
        }
        self.signals() != before
    }

    /// Apply deferred effects of the last input. Returns whether any signal
    /// changed.
    pub fn settle(&mut self) -> bool {
        if !std::mem::take(&mut self.touch_lifted) || self.is_held() {
            return false;
        }
        if self.hover_kind != Some(PointerKind::Touch) {
            return false;
        }
        self.hover_kind = None;
        self.over = false;
        true
    }

    /// Cancel any press: `held = false`, `interrupted = true`.
    ///
    /// A latch is left alone, so a latched button stays down. Idempotent.
    /// Returns whether any signal changed.
    pub fn interrupt(&mut self) -> bool {
        let changed = self.press.is_some() || !self.interrupted;
        self.press = None;
        self.interrupted = true;
        changed
    }

    /// Latch the button down, or release the latch.
    ///
    /// Returns whether any signal changed.
    pub fn set_latched(&mut self, latched: bool) -> bool {
        let before = self.signals();
        self.latched = latched;
        self.signals() != before
    }

    /// Mirror the enabled property. Disabling interrupts.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        let mut changed = self.enabled != enabled;
        self.enabled = enabled;
        if !enabled {
            changed |= self.interrupt();
        }
        changed
    }
}

impl Default for InteractionSignalTracker {
    fn default() -> Self {
        Self::new(true)
    }
}
