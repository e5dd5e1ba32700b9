//! Persistence integration tests.
//!
//! These tests verify that widget state written by the logic thread's
//! commands comes back intact when the model is loaded again, and that a
//! damaged store never stops the app from starting.

use std::fs;

use crossterm::event::KeyCode;
use tokio::sync::mpsc;

use gizmo::app::{execute_command, save_state_sync};
use gizmo::config::Config;
use gizmo::fish::{self, FishBlob, WoodenFish};
use gizmo::food::{self, default_foods, FoodBlob, FoodPicker};
use gizmo::tea::{Command, Message, Model};
use gizmo::tone::{ToneEnvelope, TonePlayer};

use crate::fixtures::{day, press, test_model, type_keys, TestStore};

struct SilentPlayer;

impl TonePlayer for SilentPlayer {
    fn play(&mut self, _tone: &ToneEnvelope) -> gizmo::Result<()> {
        Ok(())
    }
}

/// Run every command the way the logic thread would, returning the
/// completion messages.
async fn run_all(commands: Vec<Command>, ts: &TestStore) -> Vec<Message> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    for cmd in commands {
        execute_command(cmd, &ts.store, &mut SilentPlayer, &tx).await;
    }
    drop(tx);
    let mut messages = Vec::new();
    while let Some(msg) = rx.recv().await {
        messages.push(msg);
    }
    messages
}

/// Test: Added food survives a restart
/// Given a food added through the add form
/// When its save command runs and the model is loaded again
/// Then the new food is in the list
#[tokio::test]
async fn test_added_food_survives_restart() {
    let ts = TestStore::new();
    let mut model = test_model();
    press(&mut model, KeyCode::Char('1'));
    press(&mut model, KeyCode::Char('a'));
    type_keys(&mut model, "pho");
    let cmds = press(&mut model, KeyCode::Enter);

    let messages = run_all(cmds, &ts).await;
    assert!(matches!(messages.as_slice(), [Message::Saved("what_to_eat")]));

    let reloaded = Model::load(&Config::default(), &ts.store);
    let last = reloaded.food.foods().last().expect("foods");
    assert_eq!(last.name, "pho");
    assert_eq!(last.category, "其他");
    assert_eq!(reloaded.food.foods().len(), default_foods().len() + 1);
}

/// Test: Knocks survive a restart on the same day
#[tokio::test]
async fn test_merit_survives_restart() {
    let ts = TestStore::new();
    let mut model = test_model();
    press(&mut model, KeyCode::Char('2'));
    let cmds = type_keys(&mut model, "    ");

    let messages = run_all(cmds, &ts).await;
    assert_eq!(messages.len(), 4);

    let blob: FishBlob = ts.store.load(fish::STORE_KEY);
    assert_eq!(blob.merit, Some(4));
    assert_eq!(blob.date.as_deref(), Some("2026-10-19"));

    let restored = WoodenFish::from_blob(blob, day(19), true);
    assert_eq!(restored.merit(), 4);
    assert_eq!(restored.today_merit(), 4);
}

/// Test: Stored JSON uses the documented field names
#[test]
fn test_blob_field_names_on_disk() {
    let ts = TestStore::new();
    let mut model = test_model();
    model.fish.knock(model.now, model.today, &mut model.rng);
    model.food.pick_now(&mut model.rng).unwrap();

    save_state_sync(&model, &ts.store);

    let fish_json = fs::read_to_string(ts.blob_path("wooden_fish")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&fish_json).unwrap();
    assert_eq!(value["merit"], 1);
    assert_eq!(value["todayMerit"], 1);
    assert_eq!(value["date"], "2026-10-19");

    let food_json = fs::read_to_string(ts.blob_path("what_to_eat")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&food_json).unwrap();
    assert_eq!(value["foods"].as_array().unwrap().len(), default_foods().len());
    assert_eq!(value["history"].as_array().unwrap().len(), 1);
    assert!(value["foods"][0]["name"].is_string());
    assert!(value["foods"][0]["category"].is_string());
}

/// Test: Yesterday's daily count is dropped on load
#[test]
fn test_stale_daily_count_dropped() {
    let ts = TestStore::new();
    fs::create_dir_all(ts.store.dir()).unwrap();
    fs::write(
        ts.blob_path("wooden_fish"),
        r#"{"merit": 30, "todayMerit": 7, "date": "2026-10-18"}"#,
    )
    .unwrap();

    let fish = WoodenFish::from_blob(ts.store.load(fish::STORE_KEY), day(19), true);
    assert_eq!(fish.merit(), 30);
    assert_eq!(fish.today_merit(), 0);
}

/// Test: A blob with only history keeps the built-in foods
#[test]
fn test_partial_food_blob() {
    let ts = TestStore::new();
    fs::create_dir_all(ts.store.dir()).unwrap();
    fs::write(ts.blob_path("what_to_eat"), r#"{"history": ["火锅", "寿司"]}"#).unwrap();

    let picker = FoodPicker::from_blob(ts.store.load::<FoodBlob>(food::STORE_KEY));
    assert_eq!(picker.foods(), default_foods().as_slice());
    assert_eq!(picker.history(), ["火锅".to_string(), "寿司".to_string()]);
}

/// Test: Malformed blobs fall back to defaults
/// Given garbage in both blob files
/// When the model loads
/// Then it starts with default foods and zero merit
#[test]
fn test_malformed_blobs_fall_back() {
    let ts = TestStore::new();
    fs::create_dir_all(ts.store.dir()).unwrap();
    fs::write(ts.blob_path("what_to_eat"), "{not json").unwrap();
    fs::write(ts.blob_path("wooden_fish"), "42").unwrap();

    let model = Model::load(&Config::default(), &ts.store);
    assert_eq!(model.food.foods(), default_foods().as_slice());
    assert!(model.food.history().is_empty());
    assert_eq!(model.fish.merit(), 0);
}

/// Test: A save failure becomes an error notification
#[tokio::test]
async fn test_save_failure_notifies() {
    let ts = TestStore::new();
    // The store directory path is taken by a plain file.
    fs::write(ts.store.dir(), "").unwrap();

    let mut model = test_model();
    press(&mut model, KeyCode::Char('2'));
    let cmds = press(&mut model, KeyCode::Char(' '));
    let messages = run_all(cmds, &ts).await;

    for msg in messages {
        gizmo::tea::update(&mut model, msg);
    }
    let note = model.notification.expect("error shown");
    assert!(note.message.contains("wooden_fish"));
}

/// Test: Resetting merit is persisted
#[tokio::test]
async fn test_reset_is_persisted() {
    let ts = TestStore::new();
    let mut model = test_model();
    press(&mut model, KeyCode::Char('2'));
    let mut cmds = type_keys(&mut model, "  ");
    press(&mut model, KeyCode::Char('r'));
    cmds.extend(press(&mut model, KeyCode::Char('y')));

    run_all(cmds, &ts).await;

    let blob: FishBlob = ts.store.load(fish::STORE_KEY);
    assert_eq!(blob.merit, Some(0));
    assert_eq!(blob.today_merit, Some(0));
}
