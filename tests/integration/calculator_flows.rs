//! Calculator integration tests.
//!
//! The keyboard, the on-screen keypad and the `calc` key script all feed
//! the same reducer; these tests check they agree.

use crossterm::event::KeyCode;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use gizmo::calculator::keys::{KEYPAD_COLS, KEYPAD_ROWS};
use gizmo::calculator::{
    pending_line, present_display, run_script, CalcEvent, CalculatorState, KeypadFocus, KEYPAD,
};
use gizmo::tea::{Screen, Widget};

use crate::fixtures::{press, test_model, type_keys};

fn open_calculator() -> gizmo::tea::Model {
    let mut model = test_model();
    press(&mut model, KeyCode::Char('3'));
    assert_eq!(model.screen, Screen::Open(Widget::Calculator));
    model
}

fn display(model: &gizmo::tea::Model) -> String {
    model
        .calculator
        .as_ref()
        .expect("calculator open")
        .display()
        .to_string()
}

/// Test: Immediate execution
/// Given 2 + 3 × 4 =
/// When typed on the keyboard
/// Then the result is 20, not 14
#[test]
fn test_immediate_execution_from_keyboard() {
    let mut model = open_calculator();
    type_keys(&mut model, "2+3*4");
    press(&mut model, KeyCode::Enter);
    assert_eq!(display(&model), "20");
}

/// Test: Keypad and keyboard converge
/// Given the same button sequence
/// When pressed once via keypad focus and once via keys
/// Then both calculators end in the same state
#[test]
fn test_keypad_matches_keyboard() {
    let mut by_keys = open_calculator();
    type_keys(&mut by_keys, "12/4=");

    let mut by_pad = open_calculator();
    // Labels to visit: 1, 2, ÷, 4, =
    for label in ["1", "2", "÷", "4", "="] {
        by_pad.keypad_focus = focus_of(label);
        press(&mut by_pad, KeyCode::Char(' '));
    }

    assert_eq!(by_keys.calculator, by_pad.calculator);
    assert_eq!(display(&by_pad), "3");
}

fn focus_of(label: &str) -> KeypadFocus {
    for row in 0..KEYPAD_ROWS {
        for col in 0..KEYPAD_COLS {
            if KEYPAD[row][col] == label {
                return KeypadFocus { row, col };
            }
        }
    }
    panic!("no keypad button labelled {}", label);
}

/// Test: Documented examples
/// Given each example key script
/// When run through the script runner
/// Then the display matches
#[test]
fn test_script_examples() {
    let cases = [
        ("9/0=", "0"),
        ("2+3*4=", "20"),
        ("1..5", "1.5"),
        ("9+1", "1"),
        ("5nn", "5"),
        ("50%", "0.5"),
        ("0<", "0"),
        ("7<", "0"),
        ("0.1+0.2=", "0.30000000000000004"),
    ];
    for (keys, expected) in cases {
        let state = run_script(keys).unwrap();
        assert_eq!(state.display(), expected, "keys {:?}", keys);
    }
}

/// Test: Pending line
/// Given a value and an operator awaiting an operand
/// Then the secondary line shows them, and it disappears after equals
#[test]
fn test_pending_line_lifecycle() {
    let state = run_script("12*").unwrap();
    assert_eq!(pending_line(&state).as_deref(), Some("12 ×"));

    let state = state.apply(CalcEvent::Equals);
    assert_eq!(pending_line(&state), None);
}

/// Test: Wide results switch to exponential notation
#[test]
fn test_wide_result_presentation() {
    let state = run_script("999999*999999=").unwrap();
    assert_eq!(state.display(), "999998000001");
    assert_eq!(present_display(state.display()), "999998000001");

    let state = run_script("9999999*9999999=").unwrap();
    assert_eq!(present_display(state.display()), "9.999998e+13");
}

/// Test: Clear is idempotent and total
#[test]
fn test_clear_always_returns_initial_state() {
    for keys in ["", "1+", "3.5n", "9/0=", "8*%"] {
        let cleared = run_script(keys).unwrap().clear();
        assert_eq!(cleared, CalculatorState::new());
        assert_eq!(cleared.clone().clear(), cleared);
    }
}

/// Test: Random keypad mashing keeps the display well-formed
/// Given thousands of random keypad presses
/// Then the display always parses as a finite number with at most one point
#[test]
fn test_random_keypad_presses_keep_display_valid() {
    let mut rng = StdRng::seed_from_u64(19);
    let mut model = open_calculator();

    for _ in 0..5_000 {
        model.keypad_focus = KeypadFocus {
            row: rng.gen_range(0..KEYPAD_ROWS),
            col: rng.gen_range(0..KEYPAD_COLS),
        };
        press(&mut model, KeyCode::Char(' '));

        let shown = display(&model);
        assert!(shown.matches('.').count() <= 1, "display {:?}", shown);
        let value: f64 = shown.parse().expect("display parses");
        assert!(value.is_finite() || shown.len() > 300, "display {:?}", shown);
    }
}
