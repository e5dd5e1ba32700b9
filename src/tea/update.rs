//! Pure update function for the TEA (The Elm Architecture) pattern.
//!
//! The update function takes a model and a message, mutates the model,
//! and returns a list of commands to execute.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::calculator::{event_for_key, CalcEvent, CalculatorState, KeypadFocus};
use crate::food::{SpinStep, DEFAULT_CATEGORY};
use crate::{zlog, zlog_debug, zlog_warn};

use super::command::Command;
use super::message::Message;
use super::model::{InputKind, Mode, Model, Notification, NotificationLevel, Screen, Widget};

/// Helper to set an error notification and mark model as dirty.
fn set_error(model: &mut Model, message: String) {
    zlog_warn!("UI Error: {}", message);
    model.notification = Some(Notification {
        level: NotificationLevel::Error,
        message,
    });
    model.dirty = true;
}

fn set_info(model: &mut Model, message: String) {
    model.notification = Some(Notification {
        level: NotificationLevel::Info,
        message,
    });
    model.dirty = true;
}

/// Pure update function: Model + Message → Commands
///
/// This function:
/// 1. Takes the current model and an input message
/// 2. Mutates the model state (and sets dirty flag)
/// 3. Returns a list of commands (side effects) to execute
///
/// The function itself has no side effects - all I/O happens via returned Commands.
pub fn update(model: &mut Model, msg: Message) -> Vec<Command> {
    let mut cmds = Vec::new();

    match msg {
        Message::Key(key) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                cmds.push(Command::Quit);
                return cmds;
            }
            model.notification = None; // Clear notification on any key press
            model.dirty = true; // Keyboard input always triggers render
            match model.mode {
                Mode::Normal => match model.screen {
                    Screen::Menu => update_menu(model, key, &mut cmds),
                    Screen::Open(Widget::Calculator) => update_calculator(model, key),
                    Screen::Open(Widget::WhatToEat) => update_food(model, key, &mut cmds),
                    Screen::Open(Widget::WoodenFish) => update_fish(model, key, &mut cmds),
                },
                Mode::Input(kind) => update_input_mode(model, key, kind, &mut cmds),
            }
        }

        Message::Resize(_, _) => {
            model.dirty = true; // Resize triggers re-render
        }

        Message::Tick { now, today } => {
            model.now = now;
            model.today = today;

            match model.food.advance(now, &mut model.rng) {
                SpinStep::Idle => {}
                SpinStep::Frame => model.dirty = true,
                SpinStep::Finished(pick) => {
                    zlog!("Food spin finished pick={}", pick);
                    model.dirty = true;
                    cmds.push(Command::SaveFood(model.food.to_blob()));
                }
            }

            if model.fish.expire(now) {
                model.dirty = true;
            }
            if model.fish.roll_date(today) {
                model.dirty = true;
                cmds.push(Command::SaveFish(model.fish.to_blob()));
            }
        }

        // Command completion callbacks
        Message::Saved(key) => {
            zlog_debug!("Message::Saved key={}", key);
        }

        Message::SaveFailed(key, err) => {
            zlog_warn!("Message::SaveFailed key={} err={}", key, err);
            set_error(model, format!("Failed to save {}: {}", key, err));
        }
    }

    cmds
}

fn open_widget(model: &mut Model, widget: Widget) {
    zlog_debug!("open_widget {}", widget.name());
    if widget == Widget::Calculator {
        model.calculator = Some(CalculatorState::new());
        model.keypad_focus = KeypadFocus::default();
    }
    model.screen = Screen::Open(widget);
    model.show_keymap = false;
}

fn close_widget(model: &mut Model) {
    if let Screen::Open(widget) = model.screen {
        zlog_debug!("close_widget {}", widget.name());
        match widget {
            Widget::Calculator => model.calculator = None,
            Widget::WhatToEat => model.food.cancel_spin(),
            Widget::WoodenFish => {}
        }
    }
    model.screen = Screen::Menu;
    model.show_keymap = false;
}

fn update_menu(model: &mut Model, key: KeyEvent, cmds: &mut Vec<Command>) {
    let len = Widget::ALL.len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            model.menu_selected = (model.menu_selected + 1) % len;
        }
        KeyCode::Char('k') | KeyCode::Up => {
            model.menu_selected = (model.menu_selected + len - 1) % len;
        }
        KeyCode::Enter => open_widget(model, model.selected_widget()),
        KeyCode::Char(c @ '1'..='3') => {
            let idx = (c as u8 - b'1') as usize;
            model.menu_selected = idx;
            open_widget(model, Widget::ALL[idx]);
        }
        KeyCode::Char('t') => {
            model.dark_mode = !model.dark_mode;
        }
        KeyCode::Char('?') => {
            model.show_keymap = !model.show_keymap;
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            cmds.push(Command::Quit);
        }
        _ => {}
    }
}

fn update_calculator(model: &mut Model, key: KeyEvent) {
    let event = match key.code {
        KeyCode::Char('q') => {
            close_widget(model);
            return;
        }
        KeyCode::Char('?') => {
            model.show_keymap = !model.show_keymap;
            return;
        }
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
            let (d_row, d_col) = match key.code {
                KeyCode::Up => (-1, 0),
                KeyCode::Down => (1, 0),
                KeyCode::Left => (0, -1),
                _ => (0, 1),
            };
            model.keypad_focus = model.keypad_focus.moved(d_row, d_col);
            return;
        }
        KeyCode::Char(' ') => model.keypad_focus.event(),
        _ => event_for_key(key),
    };

    if let Some(event) = event {
        apply_calc_event(model, event);
    }
}

/// Keyboard and keypad both end up here.
fn apply_calc_event(model: &mut Model, event: CalcEvent) {
    if let Some(state) = model.calculator.take() {
        zlog_debug!("calculator event={:?}", event);
        model.calculator = Some(state.apply(event));
    }
}

fn update_food(model: &mut Model, key: KeyEvent, cmds: &mut Vec<Command>) {
    let count = model.food.foods().len();
    match key.code {
        KeyCode::Char('q') => close_widget(model),
        KeyCode::Char('?') => model.show_keymap = !model.show_keymap,
        KeyCode::Char(' ') | KeyCode::Enter => match model.food.start_spin(model.now) {
            Ok(true) => zlog_debug!("Food spin started foods={}", count),
            Ok(false) => {}
            Err(e) => set_error(model, e.to_string()),
        },
        KeyCode::Char('h') => model.show_history = !model.show_history,
        KeyCode::Char('a') => {
            model.input_buffer.clear();
            model.pending_category = DEFAULT_CATEGORY.to_string();
            model.mode = Mode::Input(InputKind::FoodName);
        }
        KeyCode::Char('j') | KeyCode::Down if count > 0 => {
            model.food_selected = (model.food_selected + 1) % count;
        }
        KeyCode::Char('k') | KeyCode::Up if count > 0 => {
            model.food_selected = (model.food_selected + count - 1) % count;
        }
        KeyCode::Char('d') => {
            let Some(food) = model.food.foods().get(model.food_selected) else {
                return;
            };
            let name = food.name.clone();
            let removed = model.food.remove_food(&name);
            zlog!("Removed food name={} count={}", name, removed);
            let remaining = model.food.foods().len();
            model.food_selected = model.food_selected.min(remaining.saturating_sub(1));
            set_info(model, format!("Removed {}", name));
            cmds.push(Command::SaveFood(model.food.to_blob()));
        }
        _ => {}
    }
}

fn update_fish(model: &mut Model, key: KeyEvent, cmds: &mut Vec<Command>) {
    match key.code {
        KeyCode::Char('q') => close_widget(model),
        KeyCode::Char('?') => model.show_keymap = !model.show_keymap,
        KeyCode::Char(' ') | KeyCode::Enter => {
            if model.fish.knock(model.now, model.today, &mut model.rng) {
                cmds.push(Command::PlayTone);
            }
            cmds.push(Command::SaveFish(model.fish.to_blob()));
        }
        KeyCode::Char('s') => {
            let on = model.fish.toggle_sound();
            set_info(model, format!("Sound {}", if on { "on" } else { "off" }));
        }
        KeyCode::Char('r') => {
            model.mode = Mode::Input(InputKind::ConfirmReset);
        }
        _ => {}
    }
}

fn update_input_mode(model: &mut Model, key: KeyEvent, kind: InputKind, cmds: &mut Vec<Command>) {
    match kind {
        InputKind::ConfirmReset => match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                model.fish.reset();
                model.mode = Mode::Normal;
                zlog!("Merit reset");
                set_info(model, "Merit cleared".to_string());
                cmds.push(Command::SaveFish(model.fish.to_blob()));
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                model.mode = Mode::Normal;
            }
            _ => {}
        },

        InputKind::FoodName => match key.code {
            KeyCode::Enter => {
                let name = std::mem::take(&mut model.input_buffer);
                model.mode = Mode::Normal;
                if model.food.add_food(&name, &model.pending_category) {
                    zlog!(
                        "Added food name={} category={}",
                        name.trim(),
                        model.pending_category
                    );
                    model.food_selected = model.food.foods().len() - 1;
                    set_info(model, format!("Added {}", name.trim()));
                    cmds.push(Command::SaveFood(model.food.to_blob()));
                }
            }
            KeyCode::Esc => {
                model.input_buffer.clear();
                model.mode = Mode::Normal;
            }
            KeyCode::Tab => cycle_category(model),
            KeyCode::Backspace => {
                model.input_buffer.pop();
            }
            KeyCode::Char(c) => {
                model.input_buffer.push(c);
            }
            _ => {}
        },
    }
}

/// Step the pending category through the existing categories, plus the
/// default one if no food uses it yet.
fn cycle_category(model: &mut Model) {
    let mut options: Vec<String> = model
        .food
        .categories()
        .into_iter()
        .map(str::to_string)
        .collect();
    if !options.iter().any(|c| c == DEFAULT_CATEGORY) {
        options.push(DEFAULT_CATEGORY.to_string());
    }
    let next = options
        .iter()
        .position(|c| *c == model.pending_category)
        .map_or(0, |i| (i + 1) % options.len());
    model.pending_category = options[next].clone();
}
