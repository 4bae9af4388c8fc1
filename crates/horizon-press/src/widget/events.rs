//! Raw input delivered to button models.
//!
//! The host (scene graph, accessibility layer, or a test) translates its
//! native pointer, focus and keyboard events into [`ButtonInput`] values and
//! feeds them to a [`ButtonModel`](super::widgets::ButtonModel). Hit testing
//! happens upstream: a model only learns that a pointer entered or left it.

/// The kind of device behind a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// A mouse or trackpad.
    Mouse,
    /// A finger on a touch screen.
    Touch,
    /// A stylus.
    Pen,
}

impl PointerKind {
    /// Whether the device reports position without being pressed.
    ///
    /// A finger is only "over" something while it touches the screen, so touch
    /// hover never produces an over appearance on its own.
    pub fn can_hover(self) -> bool {
        !matches!(self, Self::Touch)
    }
}

/// Keyboard keys the button models react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[rustfmt::skip]
pub enum Key {
    // Activation
    Space, Enter,

    // Navigation
    ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
    Home, End, PageUp, PageDown,

    // Focus and dismissal
    Tab, Escape,
}

impl Key {
    /// Space and Enter press a focused button.
    pub fn is_activation(self) -> bool {
        matches!(self, Self::Space | Self::Enter)
    }

    /// Check if this is an arrow key.
    pub fn is_arrow(self) -> bool {
        matches!(
            self,
            Self::ArrowUp | Self::ArrowDown | Self::ArrowLeft | Self::ArrowRight
        )
    }
}

/// A raw input event for a single button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonInput {
    /// A pointer moved into the button's hit region.
    PointerEnter(PointerKind),
    /// The pointer left the hit region.
    PointerExit,
    /// The primary pointer button (or a finger) went down over the button.
    PointerDown(PointerKind),
    /// The pointer that pressed the button was released.
    PointerUp,
    /// The platform cancelled the pointer interaction.
    PointerCancel,
    /// The button gained keyboard focus.
    FocusIn,
    /// The button lost keyboard focus.
    FocusOut,
    /// A key went down while the button may have focus.
    KeyDown(Key),
    /// A key was released.
    KeyUp(Key),
}
