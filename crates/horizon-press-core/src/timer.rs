//! Timer system for Horizon Press.
//!
//! Provides one-shot and repeating timers driven by the host run-loop. The
//! queue keeps its own virtual clock: nothing happens until the host calls
//! [`TimerQueue::advance`] with the time elapsed since the previous frame.
//! This keeps hold-to-repeat cadence deterministic and lets tests simulate
//! any amount of time without sleeping.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::TimerError;
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// The type of timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once after the specified duration.
    OneShot,
    /// Fires repeatedly at the specified interval.
    Repeating,
}

type TimerCallback = Arc<dyn Fn() + Send + Sync>;

/// Internal timer data.
struct TimerData {
    /// The interval for repeating timers.
    interval: Duration,
    /// The kind of timer.
    kind: TimerKind,
    /// Invoked each time the timer fires.
    callback: TimerCallback,
}

/// An entry in the timer queue (min-heap by fire time, FIFO among ties).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Duration,
    seq: u64,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time && self.seq == other.seq
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other
            .fire_time
            .cmp(&self.fire_time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

struct TimerState {
    /// Virtual time elapsed since the queue was created.
    now: Duration,
    /// All registered timers.
    timers: SlotMap<TimerId, TimerData>,
    /// Priority queue of pending timer fires.
    queue: BinaryHeap<TimerQueueEntry>,
    /// Tie-breaker so timers due at the same instant fire in schedule order.
    next_seq: u64,
}

impl TimerState {
    fn push(&mut self, id: TimerId, fire_time: Duration) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(TimerQueueEntry { id, fire_time, seq });
    }

    fn insert(&mut self, delay: Duration, kind: TimerKind, callback: TimerCallback) -> TimerId {
        let id = self.timers.insert(TimerData {
            interval: delay,
            kind,
            callback,
        });
        let fire_time = self.now + delay;
        self.push(id, fire_time);
        id
    }

    /// Pop the next entry due at or before `deadline`, skipping cleared timers.
    fn pop_due(&mut self, deadline: Duration) -> Option<(TimerId, Duration, TimerCallback)> {
        while let Some(entry) = self.queue.peek().copied() {
            if entry.fire_time > deadline {
                return None;
            }
            self.queue.pop();

            let Some(timer) = self.timers.get(entry.id) else {
                continue;
            };
            let callback = timer.callback.clone();
            let (kind, interval) = (timer.kind, timer.interval);

            self.now = entry.fire_time;
            match kind {
                TimerKind::OneShot => {
                    self.timers.remove(entry.id);
                }
                TimerKind::Repeating => {
                    // Reschedule from the due time, not from the host's frame
                    // time, so cadence does not drift with frame length.
                    self.push(entry.id, entry.fire_time + interval);
                }
            }
            return Some((entry.id, entry.fire_time, callback));
        }
        None
    }
}

/// A host-driven queue of one-shot and repeating timers.
///
/// `TimerQueue` plays the role of a run-loop's timer facility: widgets
/// schedule callbacks on it, and the host advances it once per frame.
///
/// # Example
///
/// ```
/// use horizon_press_core::TimerQueue;
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::time::Duration;
///
/// let timers = TimerQueue::new();
/// let ticks = Arc::new(AtomicUsize::new(0));
///
/// let ticks_clone = ticks.clone();
/// timers
///     .set_interval(Duration::from_millis(100), move || {
///         ticks_clone.fetch_add(1, Ordering::SeqCst);
///     })
///     .unwrap();
///
/// timers.advance(Duration::from_millis(350));
/// assert_eq!(ticks.load(Ordering::SeqCst), 3);
/// ```
pub struct TimerQueue {
    inner: Mutex<TimerState>,
}

impl TimerQueue {
    /// Create a new, empty timer queue at virtual time zero.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TimerState {
                now: Duration::ZERO,
                timers: SlotMap::with_key(),
                queue: BinaryHeap::new(),
                next_seq: 0,
            }),
        }
    }

    /// Create a new shared timer queue.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// The current virtual time.
    pub fn now(&self) -> Duration {
        self.inner.lock().now
    }

    /// Schedule `callback` to run once, `delay` from now.
    ///
    /// Returns the timer ID that can be used to cancel the timer.
    pub fn set_timeout<F>(&self, delay: Duration, callback: F) -> TimerId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner
            .lock()
            .insert(delay, TimerKind::OneShot, Arc::new(callback))
    }

    /// Schedule `callback` to run every `interval`, first `interval` from now.
    ///
    /// Returns the timer ID that can be used to cancel the timer.
    pub fn set_interval<F>(&self, interval: Duration, callback: F) -> Result<TimerId, TimerError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        if interval.is_zero() {
            return Err(TimerError::ZeroInterval);
        }
        Ok(self
            .inner
            .lock()
            .insert(interval, TimerKind::Repeating, Arc::new(callback)))
    }

    /// Stop and remove a timer.
    ///
    /// Returns `Ok(())` if the timer was found and removed, or an error if not found.
    pub fn clear(&self, id: TimerId) -> Result<(), TimerError> {
        // Stale heap entries are skipped lazily by `pop_due`.
        if self.inner.lock().timers.remove(id).is_some() {
            Ok(())
        } else {
            Err(TimerError::InvalidTimerId)
        }
    }

    /// Check if a timer is still scheduled.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.inner.lock().timers.contains_key(id)
    }

    /// Get the number of scheduled timers.
    pub fn active_count(&self) -> usize {
        self.inner.lock().timers.len()
    }

    /// Get the virtual time until the next timer fires, if any.
    pub fn time_until_next(&self) -> Option<Duration> {
        let mut state = self.inner.lock();
        while let Some(entry) = state.queue.peek() {
            if state.timers.contains_key(entry.id) {
                return Some(entry.fire_time.saturating_sub(state.now));
            }
            state.queue.pop();
        }
        None
    }

    /// Advance the virtual clock by `elapsed`, firing every timer that comes due.
    ///
    /// Timers fire in due-time order. The queue lock is released while each
    /// callback runs, so callbacks may schedule or clear timers; a timer
    /// scheduled from a callback fires within this same call if it comes due
    /// before the new time.
    ///
    /// Returns the number of callbacks invoked.
    #[tracing::instrument(skip(self), target = "horizon_press_core::timer", level = "trace")]
    pub fn advance(&self, elapsed: Duration) -> usize {
        let deadline = self.inner.lock().now + elapsed;
        let mut fired = 0;

        loop {
            let Some((id, at, callback)) = self.inner.lock().pop_due(deadline) else {
                break;
            };
            tracing::trace!(target: targets::TIMER, ?id, at_ms = at.as_millis() as u64, "timer fired");
            callback();
            fired += 1;
        }

        let mut state = self.inner.lock();
        if state.now < deadline {
            state.now = deadline;
        }
        fired
    }
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("TimerQueue")
            .field("now", &state.now)
            .field("active", &state.timers.len())
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

    #[test]
    fn test_one_shot_fires_once_at_deadline() {
        let timers = TimerQueue::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        let id = timers.set_timeout(ms(400), move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(timers.advance(ms(399)), 0);
        assert!(timers.is_active(id));
        assert_eq!(timers.advance(ms(1)), 1);
        assert!(!timers.is_active(id));
        assert_eq!(timers.advance(ms(1000)), 0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(timers.now(), ms(1400));
    }

    #[test]
    fn test_repeating_fires_every_interval_within_one_advance() {
        let timers = TimerQueue::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        timers
            .set_interval(ms(100), move || {
                count_clone.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        assert_eq!(timers.advance(ms(250)), 2);
        assert_eq!(timers.advance(ms(50)), 1);
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(timers.time_until_next(), Some(ms(100)));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let timers = TimerQueue::new();
        assert_eq!(
            timers.set_interval(Duration::ZERO, || {}).unwrap_err(),
            TimerError::ZeroInterval
        );
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn test_clear_prevents_fire() {
        let timers = TimerQueue::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        let id = timers.set_timeout(ms(10), move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(timers.clear(id).is_ok());
        assert_eq!(timers.clear(id), Err(TimerError::InvalidTimerId));
        assert_eq!(timers.advance(ms(100)), 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(timers.time_until_next(), None);
    }

    #[test]
    fn test_ties_fire_in_schedule_order() {
        let timers = TimerQueue::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in 0..4 {
            let order = order.clone();
            timers.set_timeout(ms(50), move || order.lock().push(tag));
        }

        timers.advance(ms(50));
        assert_eq!(*order.lock(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_callback_scheduled_during_advance_fires_in_same_advance() {
        let timers = Arc::new(TimerQueue::new());
        let times = Arc::new(Mutex::new(Vec::new()));

        let timers_clone = timers.clone();
        let times_clone = times.clone();
        timers.set_timeout(ms(400), move || {
            times_clone.lock().push(timers_clone.now());
            let inner_timers = timers_clone.clone();
            let inner_times = times_clone.clone();
            timers_clone
                .set_interval(ms(100), move || inner_times.lock().push(inner_timers.now()))
                .unwrap();
        });

        timers.advance(ms(650));
        assert_eq!(*times.lock(), vec![ms(400), ms(500), ms(600)]);
    }

    #[test]
    fn test_callback_may_clear_its_own_interval() {
        let timers = Arc::new(TimerQueue::new());
        let count = Arc::new(AtomicUsize::new(0));
        let own_id = Arc::new(Mutex::new(None));

        let timers_clone = timers.clone();
        let count_clone = count.clone();
        let own_id_clone = own_id.clone();
        let id = timers
            .set_interval(ms(10), move || {
                if count_clone.fetch_add(1, Ordering::SeqCst) == 1 {
                    if let Some(id) = *own_id_clone.lock() {
                        timers_clone.clear(id).unwrap();
                    }
                }
            })
            .unwrap();
        *own_id.lock() = Some(id);

        timers.advance(ms(100));
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(timers.active_count(), 0);
    }
}
