//! Shell integration tests: menu navigation, widget lifecycles and the
//! snapshots handed to the render thread.

use std::time::Duration;

use crossterm::event::KeyCode;

use gizmo::fish::FLOAT_DURATION;
use gizmo::food::{SPIN_FRAMES, SPIN_FRAME_INTERVAL};
use gizmo::tea::{update, Command, InputKind, Mode, NotificationLevel, Screen, Widget};

use crate::fixtures::{ctrl, day, press, test_model, tick, type_keys};

/// Test: Every widget is reachable from the menu and returns to it
#[test]
fn test_round_trip_through_every_widget() {
    let mut model = test_model();

    for (idx, widget) in Widget::ALL.iter().enumerate() {
        assert_eq!(model.menu_selected, idx);
        press(&mut model, KeyCode::Enter);
        assert_eq!(model.screen, Screen::Open(*widget));

        press(&mut model, KeyCode::Char('q'));
        assert_eq!(model.screen, Screen::Menu);

        press(&mut model, KeyCode::Char('j'));
    }
    assert_eq!(model.menu_selected, 0, "Selection wrapped back to top");
}

/// Test: Ctrl+C quits from inside a widget prompt
#[test]
fn test_ctrl_c_quits_from_prompt() {
    let mut model = test_model();
    press(&mut model, KeyCode::Char('2'));
    press(&mut model, KeyCode::Char('r'));
    assert_eq!(model.mode, Mode::Input(InputKind::ConfirmReset));

    assert_eq!(update(&mut model, ctrl('c')), vec![Command::Quit]);
}

/// Test: Theme toggle reaches the render snapshot
#[test]
fn test_theme_toggle_in_snapshot() {
    let mut model = test_model();
    assert!(model.snapshot().dark_mode);

    press(&mut model, KeyCode::Char('t'));
    assert!(!model.snapshot().dark_mode);
}

/// Test: A full spin
/// Given the food picker is open
/// When space is pressed and ticks arrive every 50ms
/// Then the wheel shows frames, stops after 2s and saves once
#[test]
fn test_spin_end_to_end() {
    let mut model = test_model();
    press(&mut model, KeyCode::Char('1'));
    let start = model.now;

    press(&mut model, KeyCode::Char(' '));
    assert!(model.snapshot().food.spinning);

    let mut saves = Vec::new();
    let mut saw_frame = false;
    let total = SPIN_FRAME_INTERVAL * SPIN_FRAMES;
    let mut elapsed = Duration::ZERO;
    while elapsed <= total {
        elapsed += Duration::from_millis(50);
        saves.extend(tick(&mut model, start, elapsed, day(19)));
        let view = model.snapshot().food;
        if view.spinning && view.result.is_some() {
            saw_frame = true;
        }
    }

    assert!(saw_frame, "Wheel should show names while spinning");
    let view = model.snapshot().food;
    assert!(!view.spinning);
    assert_eq!(view.history.len(), 1);
    assert_eq!(view.result.as_deref(), Some(view.history[0].as_str()));
    assert_eq!(saves.len(), 1);
    assert!(matches!(saves[0], Command::SaveFood(_)));
}

/// Test: Spinning twice does not restart the wheel
#[test]
fn test_second_spin_press_is_ignored() {
    let mut model = test_model();
    press(&mut model, KeyCode::Char('1'));
    let start = model.now;

    press(&mut model, KeyCode::Char(' '));
    tick(&mut model, start, SPIN_FRAME_INTERVAL * 10, day(19));
    press(&mut model, KeyCode::Enter);
    tick(&mut model, start, SPIN_FRAME_INTERVAL * SPIN_FRAMES, day(19));

    assert!(!model.food.is_spinning());
    assert_eq!(model.food.history().len(), 1);
}

/// Test: History is capped at ten entries, newest first
#[test]
fn test_history_cap() {
    let mut model = test_model();
    press(&mut model, KeyCode::Char('1'));
    let mut now = model.now;

    for _ in 0..12 {
        model.now = now;
        press(&mut model, KeyCode::Char(' '));
        now += SPIN_FRAME_INTERVAL * SPIN_FRAMES;
        update(
            &mut model,
            gizmo::tea::Message::Tick { now, today: day(19) },
        );
    }

    assert_eq!(model.food.history().len(), 10);
    assert_eq!(model.food.result(), Some(model.food.history()[0].as_str()));
}

/// Test: Removing every food leaves a picker that refuses to spin
#[test]
fn test_empty_list_refuses_spin() {
    let mut model = test_model();
    press(&mut model, KeyCode::Char('1'));

    while !model.food.foods().is_empty() {
        press(&mut model, KeyCode::Char('d'));
    }
    press(&mut model, KeyCode::Char(' '));

    assert!(!model.food.is_spinning());
    let note = model.notification.expect("error shown");
    assert_eq!(note.level, NotificationLevel::Error);
    assert_eq!(note.message, "Empty food list");
}

/// Test: Knocks animate, then the animation clears
#[test]
fn test_knock_animation_lifecycle() {
    let mut model = test_model();
    press(&mut model, KeyCode::Char('2'));
    let start = model.now;

    type_keys(&mut model, "   ");
    let fish = model.snapshot().fish;
    assert_eq!(fish.merit, 3);
    assert!(fish.struck);
    assert_eq!(fish.floating.len(), 3);

    tick(&mut model, start, Duration::from_millis(200), day(19));
    assert!(!model.snapshot().fish.struck);

    tick(&mut model, start, FLOAT_DURATION, day(19));
    assert!(model.snapshot().fish.floating.is_empty());
    assert_eq!(model.snapshot().fish.today_merit, 3);
}

/// Test: Midnight rollover
/// Given merit knocked yesterday
/// When the clock crosses into a new day
/// Then today's count restarts while lifetime merit keeps growing
#[test]
fn test_midnight_rollover() {
    let mut model = test_model();
    press(&mut model, KeyCode::Char('2'));
    let start = model.now;
    type_keys(&mut model, "  ");

    tick(&mut model, start, Duration::from_secs(1), day(20));
    press(&mut model, KeyCode::Char(' '));

    assert_eq!(model.fish.merit(), 3);
    assert_eq!(model.fish.today_merit(), 1);
    assert_eq!(model.fish.date(), day(20));
}
