//! Immediate-execution accumulator.
//!
//! Operators are applied left to right as soon as the next operator or
//! equals arrives, so `2 + 3 × 4 =` gives `20`. Every transition consumes the
//! old state and returns the next one.

use super::format::format_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
        }
    }

    /// Accepts both the display glyphs and the keyboard spellings.
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Subtract),
            "×" | "*" => Some(Operator::Multiply),
            "÷" | "/" => Some(Operator::Divide),
            _ => None,
        }
    }

    /// Combine two operands. Division by zero and overflow both collapse to
    /// zero so no infinity or NaN ever reaches the display.
    pub fn apply(self, left: f64, right: f64) -> f64 {
        let result = match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => {
                if right == 0.0 {
                    0.0
                } else {
                    left / right
                }
            }
        };
        if result.is_finite() {
            result
        } else {
            0.0
        }
    }
}

/// A single decimal digit, 0 through 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digit(u8);

impl Digit {
    pub fn new(value: u8) -> Option<Self> {
        (value <= 9).then_some(Self(value))
    }

    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10).map(|d| Self(d as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn as_char(self) -> char {
        char::from(b'0' + self.0)
    }
}

/// Everything the keypad or keyboard can ask of the accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalcEvent {
    Digit(Digit),
    Decimal,
    Operator(Operator),
    Equals,
    Clear,
    Backspace,
    ToggleSign,
    Percent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorState {
    display: String,
    pending_value: Option<f64>,
    pending_operator: Option<Operator>,
    awaiting_operand: bool,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            display: "0".to_string(),
            pending_value: None,
            pending_operator: None,
            awaiting_operand: false,
        }
    }
}

impl CalculatorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn pending_value(&self) -> Option<f64> {
        self.pending_value
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending_operator
    }

    pub fn awaiting_operand(&self) -> bool {
        self.awaiting_operand
    }

    /// Numeric value of the display.
    pub fn value(&self) -> f64 {
        parse_numeral(&self.display)
    }

    /// The single entry point shared by keyboard and keypad input.
    pub fn apply(self, event: CalcEvent) -> Self {
        match event {
            CalcEvent::Digit(d) => self.input_digit(d),
            CalcEvent::Decimal => self.input_decimal(),
            CalcEvent::Operator(op) => self.perform_operation(op),
            CalcEvent::Equals => self.equals(),
            CalcEvent::Clear => self.clear(),
            CalcEvent::Backspace => self.backspace(),
            CalcEvent::ToggleSign => self.toggle_sign(),
            CalcEvent::Percent => self.input_percent(),
        }
    }

    pub fn input_digit(mut self, digit: Digit) -> Self {
        if self.awaiting_operand {
            self.display = digit.as_char().to_string();
            self.awaiting_operand = false;
        } else if self.display == "0" {
            self.display = digit.as_char().to_string();
        } else {
            self.display.push(digit.as_char());
        }
        self
    }

    pub fn input_decimal(mut self) -> Self {
        if self.awaiting_operand {
            self.display = "0.".to_string();
            self.awaiting_operand = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
        self
    }

    pub fn toggle_sign(mut self) -> Self {
        self.display = format_number(-self.value());
        self
    }

    pub fn input_percent(mut self) -> Self {
        self.display = format_number(self.value() / 100.0);
        self
    }

    pub fn perform_operation(mut self, op: Operator) -> Self {
        let right = self.value();

        match (self.pending_value, self.pending_operator) {
            (None, _) => self.pending_value = Some(right),
            (Some(left), Some(pending)) => {
                let result = pending.apply(left, right);
                self.display = format_number(result);
                self.pending_value = Some(result);
            }
            (Some(_), None) => {}
        }

        self.pending_operator = Some(op);
        self.awaiting_operand = true;
        self
    }

    pub fn equals(mut self) -> Self {
        let (Some(left), Some(op)) = (self.pending_value, self.pending_operator) else {
            return self;
        };

        let result = op.apply(left, self.value());
        self.display = format_number(result);
        self.pending_value = None;
        self.pending_operator = None;
        self.awaiting_operand = true;
        self
    }

    pub fn clear(self) -> Self {
        Self::default()
    }

    pub fn backspace(mut self) -> Self {
        if self.display.chars().count() > 1 {
            self.display.pop();
            // "-5" loses its digit and leaves a bare sign behind
            if !is_numeral(&self.display) {
                self.display = "0".to_string();
            }
        } else {
            self.display = "0".to_string();
        }
        self
    }
}

/// Parse a display string. Anything unparsable or non-finite reads as zero.
pub fn parse_numeral(s: &str) -> f64 {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Optional leading minus, at least one digit, at most one decimal point.
pub fn is_numeral(s: &str) -> bool {
    let body = s.strip_prefix('-').unwrap_or(s);
    let mut digits = 0;
    let mut points = 0;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return false,
        }
    }
    digits > 0 && points <= 1
}
