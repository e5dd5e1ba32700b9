//! Input surfaces for the calculator: keyboard bindings and the on-screen
//! keypad. Both resolve to a [`CalcEvent`] and feed the same reducer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::{CalcEvent, CalculatorState, Digit, Operator};
use crate::{Error, Result};

/// Keyboard binding for a key event, if it has one.
pub fn event_for_key(key: KeyEvent) -> Option<CalcEvent> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }

    match key.code {
        KeyCode::Char(c) => event_for_char(c),
        KeyCode::Enter => Some(CalcEvent::Equals),
        KeyCode::Esc => Some(CalcEvent::Clear),
        KeyCode::Backspace => Some(CalcEvent::Backspace),
        _ => None,
    }
}

pub fn event_for_char(c: char) -> Option<CalcEvent> {
    if let Some(digit) = Digit::from_char(c) {
        return Some(CalcEvent::Digit(digit));
    }
    match c {
        '.' => Some(CalcEvent::Decimal),
        '=' => Some(CalcEvent::Equals),
        '%' => Some(CalcEvent::Percent),
        '+' | '-' | '*' | '/' => {
            Operator::from_symbol(c.encode_utf8(&mut [0; 4])).map(CalcEvent::Operator)
        }
        _ => None,
    }
}

pub const KEYPAD_ROWS: usize = 5;
pub const KEYPAD_COLS: usize = 4;

/// Button labels, top row first.
pub const KEYPAD: [[&str; KEYPAD_COLS]; KEYPAD_ROWS] = [
    ["AC", "±", "%", "÷"],
    ["7", "8", "9", "×"],
    ["4", "5", "6", "-"],
    ["1", "2", "3", "+"],
    ["0", ".", "⌫", "="],
];

pub fn event_for_label(label: &str) -> Option<CalcEvent> {
    match label {
        "AC" => Some(CalcEvent::Clear),
        "±" => Some(CalcEvent::ToggleSign),
        "%" => Some(CalcEvent::Percent),
        "." => Some(CalcEvent::Decimal),
        "⌫" => Some(CalcEvent::Backspace),
        "=" => Some(CalcEvent::Equals),
        _ => {
            if let Some(op) = Operator::from_symbol(label) {
                return Some(CalcEvent::Operator(op));
            }
            let mut chars = label.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Digit::from_char(c).map(CalcEvent::Digit),
                _ => None,
            }
        }
    }
}

/// Which keypad button has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeypadFocus {
    pub row: usize,
    pub col: usize,
}

impl KeypadFocus {
    /// Move focus, wrapping around the grid edges.
    pub fn moved(self, d_row: isize, d_col: isize) -> Self {
        Self {
            row: wrap(self.row, d_row, KEYPAD_ROWS),
            col: wrap(self.col, d_col, KEYPAD_COLS),
        }
    }

    pub fn label(self) -> &'static str {
        KEYPAD[self.row % KEYPAD_ROWS][self.col % KEYPAD_COLS]
    }

    pub fn event(self) -> Option<CalcEvent> {
        event_for_label(self.label())
    }
}

fn wrap(pos: usize, delta: isize, len: usize) -> usize {
    (pos as isize + delta).rem_euclid(len as isize) as usize
}

/// Binding for one character of a command-line key script. Adds letters for
/// the keys a shell argument cannot carry: `c` clear, `n` sign, `<` backspace.
pub fn event_for_script_char(c: char) -> Option<CalcEvent> {
    match c {
        'c' | 'C' => Some(CalcEvent::Clear),
        'n' | 'N' => Some(CalcEvent::ToggleSign),
        '<' => Some(CalcEvent::Backspace),
        _ => event_for_char(c),
    }
}

/// Feed a whole key script through a fresh calculator. Whitespace is skipped;
/// any other unbound character rejects the script.
pub fn run_script(keys: &str) -> Result<CalculatorState> {
    keys.chars()
        .filter(|c| !c.is_whitespace())
        .try_fold(CalculatorState::new(), |state, c| {
            event_for_script_char(c)
                .map(|event| state.apply(event))
                .ok_or_else(|| Error::Validation(format!("unbound calculator key '{}'", c)))
        })
}
