//! Keyboard hold-to-repeat.
//!
//! [`KeyRepeatBridge`] gives keyboard input the same press-and-hold cadence as
//! a pointer holding a [`PushButtonModel`](super::widgets::PushButtonModel):
//! a recognized key fires once on key down, then repeatedly after the repeat
//! delay until the key comes up.
//!
//! The bridge owns its own [`RepeatTimer`] and watches the buttons it shares a
//! widget with, so only one input modality drives repetition at a time:
//!
//! - a key press is ignored while a watched button is held down;
//! - pressing a watched button stops a running key repeat;
//! - losing focus stops the key repeat and interrupts the watched buttons.
//!
//! # Example
//!
//! ```
//! use horizon_press::widget::{Key, KeyRepeatBridge, KeyRepeatOptions};
//! use horizon_press_core::TimerQueue;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::time::Duration;
//!
//! let timers = TimerQueue::shared();
//! let bridge = KeyRepeatBridge::new(timers.clone(), KeyRepeatOptions::default(), Vec::new());
//!
//! let fires = Arc::new(AtomicUsize::new(0));
//! let fires_clone = fires.clone();
//! bridge.fired.connect(move |_key| {
//!     fires_clone.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! bridge.key_down(Key::ArrowUp);
//! timers.advance(Duration::from_millis(650));
//! bridge.key_up(Key::ArrowUp);
//!
//! // Once on key down, then at 400, 500 and 600 ms.
//! assert_eq!(fires.load(Ordering::SeqCst), 4);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use horizon_press_core::logging::targets;
use horizon_press_core::{ConnectionId, RepeatTimer, RepeatTimerOptions, Signal, TimerQueue};
use parking_lot::Mutex;

use super::events::Key;
use super::widgets::ButtonModel;

/// Configuration for a [`KeyRepeatBridge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRepeatOptions {
    /// Keys that fire and repeat.
    pub keys: Vec<Key>,
    /// Delay before repeating and interval after it.
    pub timing: RepeatTimerOptions,
}

impl KeyRepeatOptions {
    /// Repeat the given keys with the default timing.
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            timing: RepeatTimerOptions::default(),
        }
    }

    /// Set the repeat timing.
    pub fn with_timing(mut self, timing: RepeatTimerOptions) -> Self {
        self.timing = timing;
        self
    }
}

impl Default for KeyRepeatOptions {
    /// The four arrow keys plus Page Up and Page Down.
    fn default() -> Self {
        Self::new([
            Key::ArrowUp,
            Key::ArrowDown,
            Key::ArrowLeft,
            Key::ArrowRight,
            Key::PageUp,
            Key::PageDown,
        ])
    }
}

/// Keyboard press-and-hold repetition for a widget.
pub struct KeyRepeatBridge {
    keys: Vec<Key>,
    timer: RepeatTimer,
    active: Mutex<Option<Key>>,
    buttons: Vec<Arc<ButtonModel>>,
    button_links: Mutex<Vec<ConnectionId>>,
    disposed: AtomicBool,

    /// Emitted with the held key on key down and on every repeat tick.
    pub fired: Signal<Key>,
}

impl KeyRepeatBridge {
    /// Create a bridge that defers to `buttons`.
    pub fn new(
        timers: Arc<TimerQueue>,
        options: KeyRepeatOptions,
        buttons: Vec<Arc<ButtonModel>>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let tick_weak = weak.clone();
            let timer = RepeatTimer::new(timers, options.timing, move || {
                if let Some(bridge) = tick_weak.upgrade() {
                    bridge.on_tick();
                }
            });

            let button_links = buttons
                .iter()
                .map(|button| {
                    let weak = weak.clone();
                    button.transitions.connect(move |transition| {
                        if transition.pressed() {
                            if let Some(bridge) = weak.upgrade() {
                                bridge.cancel_repeat();
                            }
                        }
                    })
                })
                .collect();

            Self {
                keys: options.keys,
                timer,
                active: Mutex::new(None),
                buttons,
                button_links: Mutex::new(button_links),
                disposed: AtomicBool::new(false),
                fired: Signal::new(),
            }
        })
    }

    /// Handle a key press.
    ///
    /// Returns whether the key is one this bridge repeats. A recognized key
    /// fires immediately and starts the repeat timer, unless a repeat is
    /// already running or a watched button is held down.
    pub fn key_down(&self, key: Key) -> bool {
        if self.is_disposed() || !self.keys.contains(&key) {
            return false;
        }
        if self.buttons.iter().any(|button| button.is_held()) {
            tracing::trace!(target: targets::KEYBOARD, ?key, "key ignored, button held");
            return true;
        }

        {
            let mut active = self.active.lock();
            if active.is_some() {
                return true;
            }
            *active = Some(key);
        }

        tracing::debug!(target: targets::KEYBOARD, ?key, "key repeat started");
        {
            let _unwind = ClearOnUnwind { active: &self.active, key };
            self.fired.emit(key);
        }
        // A listener may have blurred or released us already.
        if self.active_key() == Some(key) {
            self.timer.start();
        }
        true
    }

    /// Handle a key release. Only the key that started the repeat stops it.
    pub fn key_up(&self, key: Key) -> bool {
        let stopped = {
            let mut active = self.active.lock();
            if *active == Some(key) {
                *active = None;
                true
            } else {
                false
            }
        };
        if stopped {
            self.timer.stop(false);
            tracing::debug!(target: targets::KEYBOARD, ?key, "key repeat stopped");
        }
        stopped
    }

    /// Handle focus loss: stop repeating and interrupt the watched buttons.
    pub fn blur(&self) {
        if self.cancel_repeat() {
            for button in &self.buttons {
                button.interrupt();
            }
        }
    }

    /// The key currently repeating.
    pub fn active_key(&self) -> Option<Key> {
        *self.active.lock()
    }

    /// Whether a key repeat is in progress.
    pub fn is_repeating(&self) -> bool {
        self.active_key().is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Stop the timer for good and detach from the watched buttons.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.active.lock().take();
        self.timer.dispose();
        self.disconnect_buttons();
        self.fired.disconnect_all();
    }

    fn disconnect_buttons(&self) {
        let links = std::mem::take(&mut *self.button_links.lock());
        for (button, link) in self.buttons.iter().zip(links) {
            button.transitions.disconnect(link);
        }
    }

    /// Stop a running repeat without a final fire. Returns whether one ran.
    fn cancel_repeat(&self) -> bool {
        let Some(key) = self.active.lock().take() else {
            return false;
        };
        self.timer.stop(false);
        tracing::debug!(target: targets::KEYBOARD, ?key, "key repeat cancelled");
        true
    }

    fn on_tick(&self) {
        if let Some(key) = self.active_key() {
            self.fired.emit(key);
        }
    }
}

/// Releases the active key if a `fired` listener unwinds.
struct ClearOnUnwind<'a> {
    active: &'a Mutex<Option<Key>>,
    key: Key,
}

impl Drop for ClearOnUnwind<'_> {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            return;
        }
        let mut active = self.active.lock();
        if *active == Some(self.key) {
            *active = None;
        }
    }
}

impl Drop for KeyRepeatBridge {
    fn drop(&mut self) {
        self.disconnect_buttons();
    }
}

impl fmt::Debug for KeyRepeatBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyRepeatBridge")
            .field("keys", &self.keys)
            .field("active", &self.active_key())
            .field("timer", &self.timer)
            .field("buttons", &self.buttons.len())
            .finish()
    }
}

static_assertions::assert_impl_all!(KeyRepeatBridge: Send, Sync);
