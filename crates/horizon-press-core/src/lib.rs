//! Core systems for Horizon Press.
//!
//! This crate provides the foundation the Horizon Press button models are
//! built on:
//!
//! - **Signal/Slot System**: Type-safe, re-entrancy-safe notifications
//! - **Property System**: Reactive properties with `link`/`unlink` subscription
//! - **Timers**: A host-stepped queue of one-shot and repeating timers
//! - **Repeat Timer**: Delay-then-interval scheduling for press-and-hold
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_press_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Repeat Timer Example
//!
//! ```
//! use horizon_press_core::{RepeatTimer, RepeatTimerOptions, TimerQueue};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::time::Duration;
//!
//! let timers = TimerQueue::shared();
//! let ticks = Arc::new(AtomicUsize::new(0));
//!
//! let ticks_clone = ticks.clone();
//! let timer = RepeatTimer::new(timers.clone(), RepeatTimerOptions::default(), move || {
//!     ticks_clone.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! timer.start();
//! // The host run-loop advances the queue once per frame.
//! timers.advance(Duration::from_millis(650));
//! timer.stop(true);
//!
//! // Ticks at 400, 500 and 600 ms.
//! assert_eq!(ticks.load(Ordering::SeqCst), 3);
//! ```

mod error;
pub mod logging;
pub mod property;
pub mod repeat_timer;
pub mod signal;
mod timer;

pub use error::TimerError;
pub use logging::PerfSpan;
pub use property::{Property, ReadOnlyProperty};
pub use repeat_timer::{
    DEFAULT_REPEAT_DELAY, DEFAULT_REPEAT_INTERVAL, RepeatTimer, RepeatTimerOptions,
};
pub use signal::{ConnectionId, Signal};
pub use timer::{TimerId, TimerKind, TimerQueue};

static_assertions::assert_impl_all!(Signal<()>: Send, Sync);
static_assertions::assert_impl_all!(Property<bool>: Send, Sync);
static_assertions::assert_impl_all!(TimerQueue: Send, Sync);
static_assertions::assert_impl_all!(RepeatTimer: Send, Sync);
