//! Push button firing model.
//!
//! [`PushButtonModel`] turns the transitions of a [`ButtonModel`] into
//! [`fired`](PushButtonModel::fired) notifications.
//!
//! # Firing Rules
//!
//! - **Fire on release** (default): releasing fires once if the button is
//!   still over (or focused, for keyboard presses), enabled, and the
//!   interaction was not interrupted. Dragging off before releasing cancels.
//! - **Fire on down**: pressing fires once, immediately, wherever the release
//!   later happens.
//! - **Hold to repeat**: while held, a [`RepeatTimer`] fires after the repeat
//!   delay and then every interval. A quick tap still fires exactly once.
//!
//! Disabling or interrupting mid-press never fires and stops repeating.
//!
//! # Example
//!
//! ```
//! use horizon_press::widget::PointerKind;
//! use horizon_press::widget::widgets::{PushButtonModel, PushButtonOptions};
//! use horizon_press_core::{RepeatTimerOptions, TimerQueue};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::time::Duration;
//!
//! let timers = TimerQueue::shared();
//! let push = PushButtonModel::new(
//!     PushButtonOptions::default().with_hold_to_repeat(timers.clone(), RepeatTimerOptions::default()),
//! );
//!
//! let fires = Arc::new(AtomicUsize::new(0));
//! let fires_clone = fires.clone();
//! push.fired.connect(move |_| {
//!     fires_clone.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! let button = push.button();
//! button.pointer_enter(PointerKind::Mouse);
//! button.pointer_down(PointerKind::Mouse);
//! timers.advance(Duration::from_millis(650));
//! button.pointer_up();
//!
//! assert_eq!(fires.load(Ordering::SeqCst), 3);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use horizon_press_core::logging::{span_names, targets};
use horizon_press_core::{
    ConnectionId, PerfSpan, Property, ReadOnlyProperty, RepeatTimer, RepeatTimerOptions, Signal,
    TimerQueue,
};
use parking_lot::Mutex;

use super::button_model::{ButtonModel, ButtonTransition};
use crate::error::Result;
use crate::widget::{InteractionState, resolve_interaction_state};

/// Press-and-hold repetition settings.
#[derive(Debug, Clone)]
pub struct HoldToRepeat {
    /// The queue the host run-loop advances.
    pub timers: Arc<TimerQueue>,
    /// Delay before the first repeat and interval after it.
    pub timing: RepeatTimerOptions,
}

/// Configuration for a [`PushButtonModel`].
#[derive(Debug, Clone, Default)]
pub struct PushButtonOptions {
    /// Fire when pressed instead of when released.
    pub fire_on_down: bool,
    /// Keep firing while held.
    pub fire_on_hold: Option<HoldToRepeat>,
    /// Enabled property to follow. A fresh `true` property when unset.
    pub enabled: Option<Arc<Property<bool>>>,
}

impl PushButtonOptions {
    /// Set whether the button fires on press.
    pub fn with_fire_on_down(mut self, fire_on_down: bool) -> Self {
        self.fire_on_down = fire_on_down;
        self
    }

    /// Enable press-and-hold repetition.
    pub fn with_hold_to_repeat(mut self, timers: Arc<TimerQueue>, timing: RepeatTimerOptions) -> Self {
        self.fire_on_hold = Some(HoldToRepeat { timers, timing });
        self
    }

    /// Enable press-and-hold repetition with timing given in milliseconds.
    ///
    /// Fails with [`ButtonError::Timer`](crate::ButtonError::Timer) if
    /// `interval_ms` is zero.
    pub fn with_hold_to_repeat_millis(
        self,
        timers: Arc<TimerQueue>,
        delay_ms: u64,
        interval_ms: u64,
    ) -> Result<Self> {
        let timing = RepeatTimerOptions::from_millis(delay_ms, interval_ms)?;
        Ok(self.with_hold_to_repeat(timers, timing))
    }

    /// Follow an existing enabled property.
    pub fn with_enabled(mut self, enabled: Arc<Property<bool>>) -> Self {
        self.enabled = Some(enabled);
        self
    }
}

/// Clears the firing flag when a fire ends, however it ends.
struct FiringGuard<'a> {
    model: &'a PushButtonModel,
}

impl Drop for FiringGuard<'_> {
    fn drop(&mut self) {
        self.model.firing.store(false, Ordering::SeqCst);
        if std::thread::panicking() {
            if let Some(timer) = &self.model.timer {
                timer.stop(false);
            }
        }
    }
}

/// A push button: fires on release, on press, or repeatedly while held.
pub struct PushButtonModel {
    button: Arc<ButtonModel>,
    fire_on_down: bool,
    timer: Option<RepeatTimer>,
    firing: AtomicBool,
    disposed: AtomicBool,
    state: Arc<Property<InteractionState>>,
    transition_link: Mutex<Option<ConnectionId>>,

    /// Emitted once per fire, including every repeat tick.
    pub fired: Signal<()>,
}

impl PushButtonModel {
    /// Create a push button model.
    pub fn new(options: PushButtonOptions) -> Arc<Self> {
        let PushButtonOptions {
            fire_on_down,
            fire_on_hold,
            enabled,
        } = options;
        let enabled = enabled.unwrap_or_else(|| Property::shared(true));
        let button = ButtonModel::new(enabled);

        Arc::new_cyclic(|weak: &Weak<Self>| {
            let timer = fire_on_hold.map(|hold| {
                let weak = weak.clone();
                RepeatTimer::new(hold.timers, hold.timing, move || {
                    if let Some(model) = weak.upgrade() {
                        model.fire();
                    }
                })
            });

            let weak = weak.clone();
            let link = button.transitions.connect(move |transition| {
                if let Some(model) = weak.upgrade() {
                    model.on_transition(transition);
                }
            });

            Self {
                state: Property::shared(resolve_interaction_state(&button.signals(), false)),
                button,
                fire_on_down,
                timer,
                firing: AtomicBool::new(false),
                disposed: AtomicBool::new(false),
                transition_link: Mutex::new(Some(link)),
                fired: Signal::new(),
            }
        })
    }

    /// The underlying button signals. Feed input here.
    pub fn button(&self) -> &Arc<ButtonModel> {
        &self.button
    }

    /// Fire now.
    ///
    /// Does nothing while disabled or after disposal.
    ///
    /// # Panics
    ///
    /// Panics if called while a fire is already in progress, such as from a
    /// `fired` listener. If a listener panics, the firing flag is cleared and
    /// repetition stopped before the panic continues.
    pub fn fire(&self) {
        assert!(
            !self.firing.swap(true, Ordering::SeqCst),
            "PushButtonModel::fire called re-entrantly"
        );
        let _guard = FiringGuard { model: self };

        if self.is_disposed() || !self.button.is_enabled() {
            tracing::trace!(target: targets::BUTTON, "fire suppressed");
            return;
        }

        let _span = PerfSpan::new(span_names::FIRE);
        tracing::debug!(target: targets::BUTTON, "push button fired");
        self.fired.emit(());
    }

    /// Whether a fire is in progress.
    pub fn is_firing(&self) -> bool {
        self.firing.load(Ordering::SeqCst)
    }

    pub fn fire_on_down(&self) -> bool {
        self.fire_on_down
    }

    /// Whether press-and-hold repetition is configured.
    pub fn has_hold_to_repeat(&self) -> bool {
        self.timer.is_some()
    }

    /// Whether the hold timer is counting.
    pub fn is_repeating(&self) -> bool {
        self.timer.as_ref().is_some_and(RepeatTimer::is_running)
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

    /// Stop the hold timer, release the button and drop all listeners.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(timer) = &self.timer {
            timer.dispose();
        }
        if let Some(link) = self.transition_link.lock().take() {
            self.button.transitions.disconnect(link);
        }
        self.button.dispose();
        self.fired.disconnect_all();
        tracing::trace!(target: targets::BUTTON, "push button disposed");
    }

    fn refresh_state(&self) {
        self.state
            .set(resolve_interaction_state(&self.button.signals(), false));
    }

    fn on_transition(&self, transition: &ButtonTransition) {
        self.refresh_state();

        if transition.pressed() {
            if self.fire_on_down {
                self.fire();
            }
            // A fire listener may already have released or disabled us.
            if let Some(timer) = &self.timer {
                if self.button.is_held() && self.button.is_enabled() {
                    timer.start();
                }
            }
        } else if transition.released() {
            let after = transition.after;
            let should_fire = !self.fire_on_down
                && (after.over || after.focused)
                && after.enabled
                && !after.interrupted;

            match &self.timer {
                Some(timer) => {
                    timer.stop(should_fire);
                }
                None if should_fire => self.fire(),
                None => {}
            }
        }
    }
}

impl Drop for PushButtonModel {
    fn drop(&mut self) {
        if let Some(link) = self.transition_link.get_mut().take() {
            self.button.transitions.disconnect(link);
        }
    }
}

impl fmt::Debug for PushButtonModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushButtonModel")
            .field("fire_on_down", &self.fire_on_down)
            .field("timer", &self.timer)
            .field("firing", &self.is_firing())
            .field("state", &self.state())
            .finish()
    }
}

static_assertions::assert_impl_all!(PushButtonModel: Send, Sync);
