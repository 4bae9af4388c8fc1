//! Repeat timers driven through a shared queue, the way a host run-loop does.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use horizon_press_core::{
    Property, RepeatTimer, RepeatTimerOptions, Signal, TimerError, TimerQueue,
};
use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_two_timers_share_one_queue() {
    init_tracing();
    let timers = TimerQueue::shared();
    let log = Arc::new(Mutex::new(Vec::new()));

    let log_a = log.clone();
    let timers_a = timers.clone();
    let a = RepeatTimer::new(timers.clone(), RepeatTimerOptions::default(), move || {
        log_a.lock().push(("a", timers_a.now().as_millis()));
    });
    let log_b = log.clone();
    let timers_b = timers.clone();
    let b = RepeatTimer::new(
        timers.clone(),
        RepeatTimerOptions::from_millis(250, 150).unwrap(),
        move || {
            log_b.lock().push(("b", timers_b.now().as_millis()));
        },
    );

    a.start();
    b.start();
    timers.advance(Duration::from_millis(560));
    a.stop(true);
    b.stop(true);

    // Ties fire in schedule order: `a` queued its delay before `b` queued
    // its interval.
    assert_eq!(
        *log.lock(),
        vec![("b", 250), ("a", 400), ("b", 400), ("a", 500), ("b", 550)]
    );
}

#[test]
fn test_restart_after_stop_starts_a_fresh_delay() {
    init_tracing();
    let timers = TimerQueue::shared();
    let ticks = Arc::new(AtomicUsize::new(0));
    let ticks_clone = ticks.clone();
    let timer = RepeatTimer::new(timers.clone(), RepeatTimerOptions::default(), move || {
        ticks_clone.fetch_add(1, Ordering::SeqCst);
    });

    timer.start();
    timers.advance(Duration::from_millis(350));
    assert!(!timer.stop(false));

    timer.start();
    timers.advance(Duration::from_millis(300));
    assert_eq!(ticks.load(Ordering::SeqCst), 0);
    timers.advance(Duration::from_millis(100));
    assert_eq!(ticks.load(Ordering::SeqCst), 1);
}

#[test]
fn test_property_change_stops_timer_from_listener() {
    init_tracing();
    let timers = TimerQueue::shared();
    let enabled = Property::shared(true);
    let ticks = Arc::new(AtomicUsize::new(0));

    let ticks_clone = ticks.clone();
    let timer = Arc::new(RepeatTimer::new(
        timers.clone(),
        RepeatTimerOptions::default(),
        move || {
            ticks_clone.fetch_add(1, Ordering::SeqCst);
        },
    ));

    let timer_clone = timer.clone();
    enabled.lazy_link(move |&on| {
        if !on {
            timer_clone.stop(false);
        }
    });

    timer.start();
    timers.advance(Duration::from_millis(520));
    enabled.set(false);
    timers.advance(Duration::from_millis(1000));

    assert_eq!(ticks.load(Ordering::SeqCst), 2);
}

#[test]
fn test_signal_emitted_from_timer_callback() {
    init_tracing();
    let timers = TimerQueue::shared();
    let ticked = Arc::new(Signal::<u128>::new());
    let seen = Arc::new(Mutex::new(Vec::new()));

    let seen_clone = seen.clone();
    ticked.connect(move |&at| seen_clone.lock().push(at));

    let ticked_clone = ticked.clone();
    let timers_clone = timers.clone();
    timers
        .set_interval(Duration::from_millis(100), move || {
            ticked_clone.emit(timers_clone.now().as_millis());
        })
        .unwrap();

    timers.advance(Duration::from_millis(330));
    assert_eq!(*seen.lock(), vec![100, 200, 300]);
}

#[test]
fn test_zero_interval_rejected() {
    assert_eq!(
        RepeatTimerOptions::from_millis(400, 0),
        Err(TimerError::ZeroInterval)
    );
    let timers = TimerQueue::new();
    assert_eq!(
        timers.set_interval(Duration::ZERO, || {}).unwrap_err(),
        TimerError::ZeroInterval
    );
}
