//! Delay-then-interval callback timer.
//!
//! A [`RepeatTimer`] drives press-and-hold auto-repeat: after `start()` it
//! waits for the initial delay, invokes its callback, then keeps invoking it
//! every interval until stopped. Time comes from a shared [`TimerQueue`], so
//! the cadence follows the host run-loop.
//!
//! # Cadence
//!
//! With a delay of 400 ms and an interval of 100 ms, a timer started at
//! `t = 0` fires at 400, 500, 600, ... ms. Holding for `t` ms therefore yields
//! `floor((t - 400) / 100) + 1` callbacks once `t >= 400`, and none before.
//! `stop(true)` adds exactly one callback when none happened yet, so a quick
//! tap still counts once.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::TimerError;
use crate::logging::targets;
use crate::timer::{TimerId, TimerQueue};

/// Default delay before the first repeat.
pub const DEFAULT_REPEAT_DELAY: Duration = Duration::from_millis(400);

/// Default interval between repeats.
pub const DEFAULT_REPEAT_INTERVAL: Duration = Duration::from_millis(100);

/// Validated delay/interval pair for a [`RepeatTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatTimerOptions {
    delay: Duration,
    interval: Duration,
}

impl RepeatTimerOptions {
    /// Create timing options.
    ///
    /// The delay may be zero (repeat starts on the next host step); the
    /// interval may not.
    pub fn new(delay: Duration, interval: Duration) -> Result<Self, TimerError> {
        if interval.is_zero() {
            return Err(TimerError::ZeroInterval);
        }
        Ok(Self { delay, interval })
    }

    /// Convenience constructor taking milliseconds.
    pub fn from_millis(delay_ms: u64, interval_ms: u64) -> Result<Self, TimerError> {
        Self::new(
            Duration::from_millis(delay_ms),
            Duration::from_millis(interval_ms),
        )
    }

    /// Delay before the first callback.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Interval between subsequent callbacks.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for RepeatTimerOptions {
    fn default() -> Self {
        Self {
            delay: DEFAULT_REPEAT_DELAY,
            interval: DEFAULT_REPEAT_INTERVAL,
        }
    }
}

#[derive(Debug, Default)]
struct RepeatState {
    running: bool,
    disposed: bool,
    /// Whether the callback has run since the last `start()`.
    fired_since_start: bool,
    /// Bumped on every start so callbacks from a previous run are ignored.
    generation: u64,
    /// The pending delay or interval timer on the queue.
    pending: Option<TimerId>,
}

struct Shared {
    queue: Arc<TimerQueue>,
    options: RepeatTimerOptions,
    callback: Box<dyn Fn() + Send + Sync>,
    state: Mutex<RepeatState>,
}

impl Shared {
    /// Called by the queue when the initial delay elapses.
    fn on_delay_elapsed(self: &Arc<Self>, generation: u64) {
        {
            let mut state = self.state.lock();
            if !state.running || state.disposed || state.generation != generation {
                return;
            }
            state.fired_since_start = true;

            let weak = Arc::downgrade(self);
            // The interval was validated non-zero by `RepeatTimerOptions`.
            state.pending = self
                .queue
                .set_interval(self.options.interval, move || {
                    if let Some(shared) = weak.upgrade() {
                        shared.on_interval(generation);
                    }
                })
                .ok();
        }
        tracing::trace!(target: targets::TIMER, "repeat timer delay elapsed");
        (self.callback)();
    }

    fn on_interval(&self, generation: u64) {
        {
            let mut state = self.state.lock();
            if !state.running || state.disposed || state.generation != generation {
                return;
            }
            state.fired_since_start = true;
        }
        tracing::trace!(target: targets::TIMER, "repeat timer tick");
        (self.callback)();
    }

    fn clear_pending(&self, state: &mut RepeatState) {
        if let Some(id) = state.pending.take() {
            // Already gone if a one-shot delay fired; nothing to clear then.
            let _ = self.queue.clear(id);
        }
    }
}

/// A start/stop timer that invokes a callback after a delay, then repeatedly.
///
/// The callback never runs while an internal lock is held, so it may call
/// [`stop`](Self::stop) or [`dispose`](Self::dispose) on the timer that
/// invoked it.
///
/// Dropping the timer disposes it.
pub struct RepeatTimer {
    shared: Arc<Shared>,
}

impl RepeatTimer {
    /// Create a stopped timer.
    pub fn new<F>(queue: Arc<TimerQueue>, options: RepeatTimerOptions, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                queue,
                options,
                callback: Box::new(callback),
                state: Mutex::new(RepeatState::default()),
            }),
        }
    }

    /// The timing this timer was created with.
    pub fn options(&self) -> RepeatTimerOptions {
        self.shared.options
    }

    /// Begin the initial delay.
    ///
    /// Starting a timer that is already running does nothing. Starting a
    /// disposed timer logs a warning and does nothing.
    pub fn start(&self) {
        let mut state = self.shared.state.lock();
        if state.disposed {
            tracing::warn!(target: targets::TIMER, "start() called on a disposed repeat timer");
            return;
        }
        if state.running {
            return;
        }

        state.running = true;
        state.fired_since_start = false;
        state.generation = state.generation.wrapping_add(1);

        let generation = state.generation;
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        state.pending = Some(self.shared.queue.set_timeout(self.shared.options.delay, move || {
            if let Some(shared) = weak.upgrade() {
                shared.on_delay_elapsed(generation);
            }
        }));
        tracing::trace!(target: targets::TIMER, generation, "repeat timer started");
    }

    /// Stop the timer.
    ///
    /// With `fire_if_pending`, the callback runs once more if it has not run
    /// since `start()`. Returns whether that final callback ran. Stopping a
    /// timer that is not running does nothing.
    pub fn stop(&self, fire_if_pending: bool) -> bool {
        let fire = {
            let mut state = self.shared.state.lock();
            if !state.running {
                return false;
            }
            state.running = false;
            self.shared.clear_pending(&mut state);
            fire_if_pending && !state.fired_since_start
        };
        tracing::trace!(target: targets::TIMER, fire, "repeat timer stopped");

        if fire {
            (self.shared.callback)();
        }
        fire
    }

    /// Halt the timer permanently.
    ///
    /// No callback runs after this returns, however long the host keeps
    /// advancing the queue.
    pub fn dispose(&self) {
        let mut state = self.shared.state.lock();
        if state.disposed {
            return;
        }
        state.disposed = true;
        state.running = false;
        self.shared.clear_pending(&mut state);
    }

    /// Whether the timer has been started and not yet stopped.
    pub fn is_running(&self) -> bool {
        self.shared.state.lock().running
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.shared.state.lock().disposed
    }
}

impl Drop for RepeatTimer {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for RepeatTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("RepeatTimer")
            .field("options", &self.shared.options)
            .field("running", &state.running)
            .field("disposed", &state.disposed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn counting_timer(queue: &Arc<TimerQueue>) -> (RepeatTimer, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        let timer = RepeatTimer::new(queue.clone(), RepeatTimerOptions::default(), move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        (timer, count)
    }

    #[test]
    fn test_options_reject_zero_interval() {
        assert_eq!(
            RepeatTimerOptions::from_millis(400, 0).unwrap_err(),
            TimerError::ZeroInterval
        );
        let options = RepeatTimerOptions::from_millis(0, 50).unwrap();
        assert_eq!(options.delay(), Duration::ZERO);
        assert_eq!(options.interval(), ms(50));
    }

    #[test]
    fn test_fires_after_delay_then_every_interval() {
        let queue = TimerQueue::shared();
        let (timer, count) = counting_timer(&queue);

        timer.start();
        queue.advance(ms(399));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        queue.advance(ms(1));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        queue.advance(ms(250));
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_hold_count_matches_cadence_formula() {
        for held in [0u64, 100, 399, 400, 450, 499, 500, 650, 1000, 1234] {
            let queue = TimerQueue::shared();
            let (timer, count) = counting_timer(&queue);

            timer.start();
            queue.advance(ms(held));
            timer.stop(true);

            let expected: usize = if held < 400 {
                1
            } else {
                1 + ((held - 400) / 100) as usize
            };
            assert_eq!(count.load(Ordering::SeqCst), expected, "held for {held} ms");
        }
    }

    #[test]
    fn test_stop_without_fire_after_quick_release() {
        let queue = TimerQueue::shared();
        let (timer, count) = counting_timer(&queue);

        timer.start();
        queue.advance(ms(50));
        assert!(!timer.stop(false));
        queue.advance(ms(1000));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(queue.active_count(), 0);
    }

    #[test]
    fn test_restart_while_running_is_noop() {
        let queue = TimerQueue::shared();
        let (timer, count) = counting_timer(&queue);

        timer.start();
        queue.advance(ms(300));
        timer.start();
        queue.advance(ms(100));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(queue.active_count(), 1);
    }

    #[test]
    fn test_dispose_after_start_never_fires() {
        let queue = TimerQueue::shared();
        let (timer, count) = counting_timer(&queue);

        timer.start();
        timer.dispose();
        queue.advance(ms(400 + 5 * 100));
        assert_eq!(count.load(Ordering::SeqCst), 0);

        timer.start();
        queue.advance(ms(1000));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(timer.is_disposed());
        assert!(!timer.is_running());
    }

    #[test]
    fn test_drop_clears_queue() {
        let queue = TimerQueue::shared();
        let (timer, count) = counting_timer(&queue);

        timer.start();
        queue.advance(ms(500));
        drop(timer);
        assert_eq!(queue.active_count(), 0);
        queue.advance(ms(500));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_callback_may_stop_its_own_timer() {
        let queue = TimerQueue::shared();
        let count = Arc::new(AtomicUsize::new(0));
        let slot: Arc<Mutex<Option<Arc<RepeatTimer>>>> = Arc::new(Mutex::new(None));

        let count_clone = count.clone();
        let slot_clone = slot.clone();
        let timer = Arc::new(RepeatTimer::new(
            queue.clone(),
            RepeatTimerOptions::default(),
            move || {
                if count_clone.fetch_add(1, Ordering::SeqCst) == 2 {
                    let timer = slot_clone.lock().clone();
                    if let Some(timer) = timer {
                        timer.stop(true);
                    }
                }
            },
        ));
        *slot.lock() = Some(timer.clone());

        timer.start();
        queue.advance(ms(2000));
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(!timer.is_running());

        // Break the slot -> timer -> callback -> slot cycle.
        slot.lock().take();
    }
}
