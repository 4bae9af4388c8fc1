//! Semantic interaction states for button appearance.
//!
//! Renderers never look at raw signals. Each model publishes a single
//! [`InteractionState`] derived by [`resolve`] from its current
//! [`ButtonSignals`] and, for stateful buttons, whether the button is latched
//! down (sticky) or selected (radio).

use std::fmt;

use super::tracker::ButtonSignals;

/// The closed set of appearances a button can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InteractionState {
    /// Nothing is happening.
    #[default]
    Idle,
    /// A pointer hovers the button.
    Over,
    /// The button is pressed or latched down.
    Pressed,
    /// Input is ignored.
    Disabled,
    /// Input is ignored and the button is latched down.
    DisabledPressed,
}

impl InteractionState {
    /// Check if this is one of the disabled states.
    pub fn is_disabled(self) -> bool {
        matches!(self, Self::Disabled | Self::DisabledPressed)
    }

    /// Check if this state draws the button pressed.
    pub fn is_pressed(self) -> bool {
        matches!(self, Self::Pressed | Self::DisabledPressed)
    }
}

impl fmt::Display for InteractionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Over => "over",
            Self::Pressed => "pressed",
            Self::Disabled => "disabled",
            Self::DisabledPressed => "disabled-pressed",
        };
        f.write_str(name)
    }
}

/// Map button signals to an interaction state.
///
/// `is_down` is `false` for push buttons, "value is the down value" for sticky
/// toggles and "value is my value" for radio members. Rules are checked in
/// order:
///
/// 1. disabled and down: `DisabledPressed`
/// 2. disabled: `Disabled`
/// 3. looks over and neither looks pressed nor is down: `Over`
/// 4. over or focused, and looks pressed or is down: `Pressed`
/// 5. is down: `Pressed`
/// 6. otherwise `Idle`
pub fn resolve(signals: &ButtonSignals, is_down: bool) -> InteractionState {
    if !signals.enabled {
        return if is_down {
            InteractionState::DisabledPressed
        } else {
            InteractionState::Disabled
        };
    }

    let pressed = signals.looks_pressed || is_down;
    if signals.looks_over && !pressed {
        InteractionState::Over
    } else if (signals.over || signals.focused) && pressed {
        InteractionState::Pressed
    } else if is_down {
        InteractionState::Pressed
    } else {
        InteractionState::Idle
    }
}
