//! End-to-end press scenarios driven through raw input and a virtual clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use horizon_press::prelude::*;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn fire_counter(push: &PushButtonModel) -> Arc<AtomicUsize> {
    let fires = Arc::new(AtomicUsize::new(0));
    let fires_clone = fires.clone();
    push.fired.connect(move |_| {
        fires_clone.fetch_add(1, Ordering::SeqCst);
    });
    fires
}

fn hold_button(timers: &Arc<TimerQueue>) -> Arc<PushButtonModel> {
    PushButtonModel::new(
        PushButtonOptions::default().with_hold_to_repeat(timers.clone(), RepeatTimerOptions::default()),
    )
}

#[test]
fn test_scenario_drag_off_then_click() {
    init_tracing();
    let push = PushButtonModel::new(PushButtonOptions::default());
    let fires = fire_counter(&push);
    let button = push.button();

    // Press, drag off, release off: no fire.
    button.handle_input(ButtonInput::PointerEnter(PointerKind::Mouse));
    button.handle_input(ButtonInput::PointerDown(PointerKind::Mouse));
    button.handle_input(ButtonInput::PointerExit);
    button.handle_input(ButtonInput::PointerUp);
    assert_eq!(fires.load(Ordering::SeqCst), 0);
    assert_eq!(push.state(), InteractionState::Idle);

    // Press and release on the button: one fire.
    button.handle_input(ButtonInput::PointerEnter(PointerKind::Mouse));
    button.handle_input(ButtonInput::PointerDown(PointerKind::Mouse));
    button.handle_input(ButtonInput::PointerUp);
    assert_eq!(fires.load(Ordering::SeqCst), 1);
    assert_eq!(push.state(), InteractionState::Over);
}

#[test]
fn test_scenario_drag_off_and_back_fires() {
    init_tracing();
    let push = PushButtonModel::new(PushButtonOptions::default());
    let fires = fire_counter(&push);
    let button = push.button();

    button.pointer_enter(PointerKind::Mouse);
    button.pointer_down(PointerKind::Mouse);
    button.pointer_exit();
    assert_eq!(push.state(), InteractionState::Idle);
    button.pointer_enter(PointerKind::Mouse);
    assert_eq!(push.state(), InteractionState::Pressed);
    button.pointer_up();

    assert_eq!(fires.load(Ordering::SeqCst), 1);
}

#[test]
fn test_hold_count_follows_delay_and_interval() {
    init_tracing();
    for held in [0u64, 50, 399, 400, 401, 499, 500, 650, 1000, 1234] {
        let timers = TimerQueue::shared();
        let push = hold_button(&timers);
        let fires = fire_counter(&push);
        let button = push.button();

        button.pointer_enter(PointerKind::Mouse);
        button.pointer_down(PointerKind::Mouse);
        timers.advance(Duration::from_millis(held));
        button.pointer_up();

        let expected = if held < 400 {
            1
        } else {
            1 + ((held - 400) / 100) as usize
        };
        assert_eq!(fires.load(Ordering::SeqCst), expected, "held {held} ms");
    }
}

#[test]
fn test_hold_650_fires_three_times_at_frame_rate() {
    init_tracing();
    let timers = TimerQueue::shared();
    let push = hold_button(&timers);
    let fires = fire_counter(&push);
    let button = push.button();

    button.pointer_enter(PointerKind::Mouse);
    button.pointer_down(PointerKind::Mouse);
    // Roughly 60 frames per second.
    for _ in 0..39 {
        timers.advance(Duration::from_micros(16_667));
    }
    assert!(timers.now() >= Duration::from_millis(650));
    button.pointer_up();

    assert_eq!(fires.load(Ordering::SeqCst), 3);
}

#[test]
fn test_fire_on_down_fires_once_wherever_released() {
    init_tracing();
    for release_over in [true, false] {
        let push = PushButtonModel::new(PushButtonOptions::default().with_fire_on_down(true));
        let fires = fire_counter(&push);
        let button = push.button();

        button.pointer_enter(PointerKind::Mouse);
        button.pointer_down(PointerKind::Mouse);
        if !release_over {
            button.pointer_exit();
        }
        button.pointer_up();
        assert_eq!(fires.load(Ordering::SeqCst), 1);
    }
}

#[test]
fn test_disable_mid_hold_never_fires_again() {
    init_tracing();
    let timers = TimerQueue::shared();
    let enabled = Property::shared(true);
    let push = PushButtonModel::new(
        PushButtonOptions::default()
            .with_enabled(enabled.clone())
            .with_hold_to_repeat(timers.clone(), RepeatTimerOptions::default()),
    );
    let fires = fire_counter(&push);
    let button = push.button();

    button.pointer_enter(PointerKind::Mouse);
    button.pointer_down(PointerKind::Mouse);
    timers.advance(Duration::from_millis(200));
    enabled.set(false);
    timers.advance(Duration::from_millis(1000));
    button.pointer_up();

    assert_eq!(fires.load(Ordering::SeqCst), 0);
    assert_eq!(push.state(), InteractionState::Disabled);
}

#[test]
fn test_cancelled_touch_does_not_fire() {
    init_tracing();
    let push = PushButtonModel::new(PushButtonOptions::default());
    let fires = fire_counter(&push);
    let button = push.button();

    button.handle_input(ButtonInput::PointerEnter(PointerKind::Touch));
    button.handle_input(ButtonInput::PointerDown(PointerKind::Touch));
    button.handle_input(ButtonInput::PointerCancel);
    button.handle_input(ButtonInput::PointerUp);

    assert_eq!(fires.load(Ordering::SeqCst), 0);
    assert!(!button.is_over());
    assert_eq!(push.state(), InteractionState::Idle);
}

#[test]
fn test_focus_loss_mid_keyboard_press() {
    init_tracing();
    let push = PushButtonModel::new(PushButtonOptions::default());
    let fires = fire_counter(&push);
    let button = push.button();

    button.handle_input(ButtonInput::FocusIn);
    button.handle_input(ButtonInput::KeyDown(Key::Enter));
    button.handle_input(ButtonInput::FocusOut);
    button.handle_input(ButtonInput::KeyUp(Key::Enter));

    assert_eq!(fires.load(Ordering::SeqCst), 0);
}

#[test]
fn test_sticky_cycles_with_first_release_off() {
    init_tracing();
    let value = Property::shared(false);
    let sticky = StickyToggleButtonModel::new(false, true, value.clone(), Property::shared(true))
        .expect("distinct values");
    let button = sticky.button();

    button.pointer_enter(PointerKind::Mouse);
    button.pointer_down(PointerKind::Mouse);
    button.pointer_exit();
    button.pointer_up();
    assert!(value.get());
    assert_eq!(sticky.state(), InteractionState::Pressed);

    button.pointer_enter(PointerKind::Mouse);
    button.pointer_down(PointerKind::Mouse);
    button.pointer_up();
    assert!(!value.get());
    assert_eq!(sticky.state(), InteractionState::Over);
}

#[test]
fn test_sticky_programmatic_press_shows_pressed() {
    init_tracing();
    let value = Property::shared("up");
    let sticky = StickyToggleButtonModel::new("up", "down", value.clone(), Property::shared(true))
        .expect("distinct values");

    let states = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let states_clone = states.clone();
    sticky
        .interaction_state()
        .lazy_link(move |state| states_clone.lock().push(*state));

    value.set("down");
    assert_eq!(*states.lock(), vec![InteractionState::Pressed]);
}

#[test]
fn test_interrupt_inside_fire_listener_stops_hold() {
    init_tracing();
    let timers = TimerQueue::shared();
    let push = hold_button(&timers);
    let fires = fire_counter(&push);

    let weak = Arc::downgrade(&push);
    push.fired.connect(move |_| {
        if let Some(push) = weak.upgrade() {
            assert!(push.is_firing());
            push.button().interrupt();
        }
    });

    let button = push.button();
    button.pointer_enter(PointerKind::Mouse);
    button.pointer_down(PointerKind::Mouse);
    timers.advance(Duration::from_millis(2000));
    button.pointer_up();

    assert_eq!(fires.load(Ordering::SeqCst), 1);
    assert!(!push.is_firing());
}

#[test]
fn test_dispose_right_after_start_never_fires() {
    init_tracing();
    let timers = TimerQueue::shared();
    let push = hold_button(&timers);
    let fires = fire_counter(&push);
    let button = push.button().clone();

    button.pointer_enter(PointerKind::Mouse);
    button.pointer_down(PointerKind::Mouse);
    push.dispose();
    timers.advance(Duration::from_millis(400 + 10 * 100));

    assert_eq!(fires.load(Ordering::SeqCst), 0);
}

#[test]
fn test_dropping_model_cancels_repeat() {
    init_tracing();
    let timers = TimerQueue::shared();
    let push = hold_button(&timers);
    let fires = fire_counter(&push);

    push.button().pointer_enter(PointerKind::Mouse);
    push.button().pointer_down(PointerKind::Mouse);
    drop(push);
    timers.advance(Duration::from_millis(2000));

    assert_eq!(fires.load(Ordering::SeqCst), 0);
    assert_eq!(timers.active_count(), 0);
}

#[test]
fn test_toggle_switch_and_radio_group() {
    init_tracing();
    let on = Property::shared(false);
    let toggle = ToggleButtonModel::new(false, true, on.clone(), PushButtonOptions::default())
        .expect("distinct values");

    let size = Property::shared('m');
    let group = RadioButtonGroup::new(size.clone(), vec!['s', 'm', 'l'], Property::shared(true))
        .expect("valid group");

    let toggle_button = toggle.push_button().button();
    toggle_button.pointer_enter(PointerKind::Pen);
    toggle_button.pointer_down(PointerKind::Pen);
    toggle_button.pointer_up();
    assert!(on.get());

    let large = group.members()[2].push_button().button();
    large.pointer_enter(PointerKind::Touch);
    large.pointer_down(PointerKind::Touch);
    large.pointer_up();
    assert_eq!(size.get(), 'l');
    assert_eq!(group.selected_index(), Some(2));
    assert_eq!(group.members()[2].state(), InteractionState::Pressed);
}
