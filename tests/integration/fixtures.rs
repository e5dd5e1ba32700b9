//! Test fixtures for integration tests.
//!
//! Provides helpers for:
//! - Store directories in temp dirs
//! - Deterministic models (fixed date, seeded rng)
//! - Key and tick messages

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use gizmo::config::Config;
use gizmo::fish::WoodenFish;
use gizmo::food::FoodPicker;
use gizmo::store::Store;
use gizmo::tea::{update, Command, Message, Model};

/// A store rooted in a temporary directory that lives as long as this value.
pub struct TestStore {
    pub temp_dir: TempDir,
    pub store: Store,
}

impl TestStore {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Store::new(temp_dir.path().join("data"));
        Self { temp_dir, store }
    }

    pub fn blob_path(&self, key: &str) -> std::path::PathBuf {
        self.store.path_for(key).expect("valid key")
    }
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).expect("valid date")
}

/// A model on 2026-10-19 with default foods, no merit and a seeded rng.
pub fn test_model() -> Model {
    Model::new(
        &Config::default(),
        FoodPicker::default(),
        WoodenFish::new(day(19), true),
        StdRng::seed_from_u64(2026),
    )
}

pub fn key(code: KeyCode) -> Message {
    Message::Key(KeyEvent::new(code, KeyModifiers::empty()))
}

pub fn ctrl(c: char) -> Message {
    Message::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

/// Press a key and return the commands it produced.
pub fn press(model: &mut Model, code: KeyCode) -> Vec<Command> {
    update(model, key(code))
}

/// Type every character of `s`, collecting all commands.
pub fn type_keys(model: &mut Model, s: &str) -> Vec<Command> {
    s.chars()
        .flat_map(|c| update(model, key(KeyCode::Char(c))))
        .collect()
}

/// Advance the model clock by `elapsed` since `start`, on `today`.
pub fn tick(model: &mut Model, start: Instant, elapsed: Duration, today: NaiveDate) -> Vec<Command> {
    update(
        model,
        Message::Tick {
            now: start + elapsed,
            today,
        },
    )
}
