//! Shared button state.
//!
//! [`ButtonModel`] owns the enabled/over/down/focused signals of one button.
//! It mirrors the consumer's enabled property, feeds raw input through an
//! [`InteractionSignalTracker`], and announces every change on
//! [`transitions`](ButtonModel::transitions) with the before and after
//! snapshots. Firing models (push, sticky, toggle, radio) subscribe to those
//! transitions and decide when to fire.
//!
//! # Example
//!
//! ```
//! use horizon_press::widget::{ButtonInput, PointerKind};
//! use horizon_press::widget::widgets::ButtonModel;
//! use horizon_press_core::Property;
//!
//! let enabled = Property::shared(true);
//! let button = ButtonModel::new(enabled.clone());
//!
//! button.transitions.connect(|t| {
//!     if t.released() {
//!         println!("released over the button: {}", t.after.over);
//!     }
//! });
//!
//! button.handle_input(ButtonInput::PointerEnter(PointerKind::Mouse));
//! button.handle_input(ButtonInput::PointerDown(PointerKind::Mouse));
//! assert!(button.is_down());
//!
//! // Disabling interrupts the press.
//! enabled.set(false);
//! assert!(!button.is_down());
//! assert!(button.is_interrupted());
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use horizon_press_core::logging::targets;
use horizon_press_core::{ConnectionId, Property, Signal};
use parking_lot::Mutex;

use crate::widget::{ButtonInput, ButtonSignals, InteractionSignalTracker, Key, PointerKind};

/// One change of a button's signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonTransition {
    /// Signals before the change.
    pub before: ButtonSignals,
    /// Signals after the change.
    pub after: ButtonSignals,
}

impl ButtonTransition {
    /// A pointer or key started holding the button.
    pub fn pressed(&self) -> bool {
        !self.before.held && self.after.held
    }

    /// The hold ended, by release or by interruption.
    pub fn released(&self) -> bool {
        self.before.held && !self.after.held
    }

    /// The button went from disabled to enabled.
    pub fn reenabled(&self) -> bool {
        !self.before.enabled && self.after.enabled
    }
}

/// The signal state of a single button.
///
/// Created shared (`Arc`) because the enabled-property subscription refers
/// back to the model weakly. Listeners on [`transitions`](Self::transitions)
/// run with no lock held, so they may feed more input, interrupt, or read any
/// getter.
pub struct ButtonModel {
    tracker: Mutex<InteractionSignalTracker>,
    enabled: Arc<Property<bool>>,
    enabled_link: Mutex<Option<ConnectionId>>,
    disposed: AtomicBool,

    /// Emitted after every change of the button's signals.
    pub transitions: Signal<ButtonTransition>,
}

impl ButtonModel {
    /// Create a model that follows `enabled`.
    pub fn new(enabled: Arc<Property<bool>>) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let link = enabled.lazy_link(move |&value| {
                if let Some(model) = weak.upgrade() {
                    model.update(|tracker| tracker.set_enabled(value));
                }
            });

            Self {
                tracker: Mutex::new(InteractionSignalTracker::new(enabled.get())),
                enabled,
                enabled_link: Mutex::new(Some(link)),
                disposed: AtomicBool::new(false),
                transitions: Signal::new(),
            }
        })
    }

    /// Feed one raw input event.
    ///
    /// Returns whether any signal changed.
    pub fn handle_input(&self, input: ButtonInput) -> bool {
        if self.is_disposed() {
            horizon_press_core::press_warn!(?input, "input to a disposed button model ignored");
            return false;
        }
        let changed = self.update(|tracker| tracker.apply(input));
        // A lifted finger stops hovering only after its release is handled.
        let settled = self.update(InteractionSignalTracker::settle);
        changed || settled
    }

    pub fn pointer_enter(&self, kind: PointerKind) -> bool {
        self.handle_input(ButtonInput::PointerEnter(kind))
    }

    pub fn pointer_exit(&self) -> bool {
        self.handle_input(ButtonInput::PointerExit)
    }

    pub fn pointer_down(&self, kind: PointerKind) -> bool {
        self.handle_input(ButtonInput::PointerDown(kind))
    }

    pub fn pointer_up(&self) -> bool {
        self.handle_input(ButtonInput::PointerUp)
    }

    pub fn pointer_cancel(&self) -> bool {
        self.handle_input(ButtonInput::PointerCancel)
    }

    pub fn focus_in(&self) -> bool {
        self.handle_input(ButtonInput::FocusIn)
    }

    pub fn focus_out(&self) -> bool {
        self.handle_input(ButtonInput::FocusOut)
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.handle_input(ButtonInput::KeyDown(key))
    }

    pub fn key_up(&self, key: Key) -> bool {
        self.handle_input(ButtonInput::KeyUp(key))
    }

    /// Cancel the current interaction.
    ///
    /// Sets `down = false` and `interrupted = true`. Safe to call at any time,
    /// including from a fire listener, and idempotent.
    pub fn interrupt(&self) -> bool {
        self.update(InteractionSignalTracker::interrupt)
    }

    /// Latch the button down, or release the latch.
    ///
    /// Used by stateful models to mirror their value into `down`. Publishes a
    /// transition with `held` unchanged, so it never counts as a press or
    /// release.
    pub fn set_latched(&self, latched: bool) -> bool {
        self.update(|tracker| tracker.set_latched(latched))
    }

    /// Snapshot of all signals.
    pub fn signals(&self) -> ButtonSignals {
        self.tracker.lock().signals()
    }

    pub fn is_enabled(&self) -> bool {
        self.tracker.lock().is_enabled()
    }

    pub fn is_over(&self) -> bool {
        self.tracker.lock().is_over()
    }

    /// Held by input or latched by the owning model.
    pub fn is_down(&self) -> bool {
        self.tracker.lock().is_down()
    }

    /// Whether a pointer or key is holding the button.
    pub fn is_held(&self) -> bool {
        self.tracker.lock().is_held()
    }

    pub fn is_latched(&self) -> bool {
        self.tracker.lock().is_latched()
    }

    pub fn is_focused(&self) -> bool {
        self.tracker.lock().is_focused()
    }

    pub fn is_interrupted(&self) -> bool {
        self.tracker.lock().is_interrupted()
    }

    pub fn looks_over(&self) -> bool {
        self.tracker.lock().looks_over()
    }

    pub fn looks_pressed(&self) -> bool {
        self.tracker.lock().looks_pressed()
    }

    /// The consumer's enabled property this model follows.
    pub fn enabled_property(&self) -> &Arc<Property<bool>> {
        &self.enabled
    }

    /// Check if [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Interrupt, release the enabled subscription and drop all transition
    /// listeners. Further input is ignored.
    pub fn dispose(&self) {
        if self.disposed.load(Ordering::SeqCst) {
            return;
        }
        self.interrupt();
        self.disposed.store(true, Ordering::SeqCst);
        self.unlink_enabled();
        self.transitions.disconnect_all();
        tracing::trace!(target: targets::BUTTON, "button model disposed");
    }

    fn unlink_enabled(&self) {
        if let Some(link) = self.enabled_link.lock().take() {
            self.enabled.unlink(link);
        }
    }

    /// Mutate the tracker and publish the transition, if any.
    fn update<F>(&self, mutate: F) -> bool
    where
        F: FnOnce(&mut InteractionSignalTracker) -> bool,
    {
        if self.is_disposed() {
            return false;
        }

        let transition = {
            let mut tracker = self.tracker.lock();
            let before = tracker.signals();
            if !mutate(&mut *tracker) {
                return false;
            }
            ButtonTransition {
                before,
                after: tracker.signals(),
            }
        };

        tracing::trace!(
            target: targets::BUTTON,
            before = ?transition.before,
            after = ?transition.after,
            "button transition"
        );
        self.transitions.emit(transition);
        true
    }
}

impl Drop for ButtonModel {
    fn drop(&mut self) {
        self.unlink_enabled();
    }
}

impl fmt::Debug for ButtonModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ButtonModel")
            .field("signals", &self.signals())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

static_assertions::assert_impl_all!(ButtonModel: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn recorder(model: &ButtonModel) -> Arc<Mutex<Vec<ButtonTransition>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = log.clone();
        model.transitions.connect(move |t| log_clone.lock().push(*t));
        log
    }

    #[test]
    fn test_press_release_transitions() {
        let button = ButtonModel::new(Property::shared(true));
        let log = recorder(&button);

        button.pointer_enter(PointerKind::Mouse);
        button.pointer_down(PointerKind::Mouse);
        button.pointer_up();

        let log = log.lock();
        assert_eq!(log.len(), 3);
        assert!(!log[0].pressed());
        assert!(log[1].pressed());
        assert!(log[2].released());
        assert!(log[2].after.over);
    }

    #[test]
    fn test_unchanged_input_emits_nothing() {
        let button = ButtonModel::new(Property::shared(true));
        let log = recorder(&button);

        // Down while not over is ignored.
        assert!(!button.pointer_down(PointerKind::Mouse));
        assert!(!button.pointer_exit());
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_touch_release_then_hover_cleared() {
        let button = ButtonModel::new(Property::shared(true));
        button.pointer_enter(PointerKind::Touch);
        button.pointer_down(PointerKind::Touch);
        let log = recorder(&button);

        button.pointer_up();

        let log = log.lock();
        assert_eq!(log.len(), 2);
        assert!(log[0].released());
        assert!(log[0].after.over);
        assert!(!log[1].after.over);
    }

    #[test]
    fn test_disable_interrupts_and_reenable_reports() {
        let enabled = Property::shared(true);
        let button = ButtonModel::new(enabled.clone());
        button.pointer_enter(PointerKind::Mouse);
        button.pointer_down(PointerKind::Mouse);
        let log = recorder(&button);

        enabled.set(false);
        assert!(!button.is_down());
        assert!(button.is_interrupted());
        assert!(!button.is_enabled());

        enabled.set(true);
        let log = log.lock();
        assert!(log[0].released());
        assert!(log[0].after.interrupted);
        assert!(log[1].reenabled());
    }

    #[test]
    fn test_interrupt_from_listener() {
        let button = ButtonModel::new(Property::shared(true));
        button.pointer_enter(PointerKind::Mouse);

        let weak = Arc::downgrade(&button);
        button.transitions.connect(move |t| {
            if t.pressed() {
                if let Some(button) = weak.upgrade() {
                    button.interrupt();
                }
            }
        });

        button.pointer_down(PointerKind::Mouse);
        assert!(!button.is_down());
        assert!(button.is_interrupted());
    }

    #[test]
    fn test_dispose_releases_subscriptions() {
        let enabled = Property::shared(true);
        let button = ButtonModel::new(enabled.clone());
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        button.transitions.connect(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(enabled.listener_count(), 1);

        button.dispose();
        button.dispose();
        assert!(button.is_disposed());
        assert_eq!(enabled.listener_count(), 0);

        let before = calls.load(Ordering::SeqCst);
        assert!(!button.pointer_enter(PointerKind::Mouse));
        enabled.set(false);
        assert_eq!(calls.load(Ordering::SeqCst), before);
        assert!(button.is_enabled());
    }

    #[test]
    fn test_pointer_cancel_interrupts_press() {
        let button = ButtonModel::new(Property::shared(true));
        button.pointer_enter(PointerKind::Mouse);
        button.pointer_down(PointerKind::Mouse);
        let log = recorder(&button);

        assert!(button.pointer_cancel());
        assert!(!button.is_down());
        assert!(button.is_interrupted());

        let log = log.lock();
        assert_eq!(log.len(), 1);
        assert!(log[0].released());
        assert!(log[0].after.interrupted);
    }

    #[test]
    fn test_pointer_cancel_leaves_keyboard_press() {
        let button = ButtonModel::new(Property::shared(true));
        button.focus_in();
        button.key_down(Key::Space);

        assert!(!button.pointer_cancel());
        assert!(button.is_held());
    }

    #[test]
    fn test_drop_unlinks_enabled() {
        let enabled = Property::shared(true);
        let button = ButtonModel::new(enabled.clone());
        assert_eq!(enabled.listener_count(), 1);
        drop(button);
        assert_eq!(enabled.listener_count(), 0);
    }
}
