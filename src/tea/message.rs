//! Messages for the TEA (The Elm Architecture) pattern.
//!
//! Messages are inputs to the update function - they come from the keyboard,
//! the ticker actor, or command completion callbacks.

use std::time::Instant;

use chrono::NaiveDate;
use crossterm::event::KeyEvent;

/// Input messages to the update function.
#[derive(Debug)]
pub enum Message {
    // Keyboard/terminal events
    Key(KeyEvent),
    Resize(u16, u16),

    /// Clock pulse from the ticker actor. Drives the food wheel, knock
    /// animations and the daily merit rollover.
    Tick { now: Instant, today: NaiveDate },

    // Persistence callbacks, keyed by store key
    Saved(&'static str),
    SaveFailed(&'static str, String),
}
