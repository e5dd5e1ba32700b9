//! Four-function calculator with immediate-execution semantics.
//!
//! - `state`: the accumulator and its events
//! - `format`: number rendering and display presentation
//! - `keys`: keyboard bindings and the on-screen keypad

pub mod format;
pub mod keys;
pub mod state;

pub use format::{format_number, pending_line, present_display, to_exponential};
pub use keys::{event_for_char, event_for_key, run_script, KeypadFocus, KEYPAD};
pub use state::{CalcEvent, CalculatorState, Digit, Operator};
