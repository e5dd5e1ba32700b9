//! Model for the TEA (The Elm Architecture) pattern.
//!
//! The Model is pure application state - no channels, no handles, no runtime
//! infrastructure. Wall-clock time arrives through `Message::Tick` and is
//! cached here so key handling stays deterministic.

use std::time::Instant;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::calculator::{pending_line, present_display, CalculatorState, KeypadFocus};
use crate::config::Config;
use crate::fish::{FishBlob, WoodenFish};
use crate::food::{FoodBlob, FoodPicker, DEFAULT_CATEGORY};
use crate::render::{next_version, CalculatorView, FishView, FloatView, FoodView, RenderState};
use crate::store::Store;
use crate::{fish, food};

/// Level of a notification message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Error notification - displayed in red with "Error:" prefix
    Error,
    /// Informational notification - displayed in green
    Info,
}

/// A notification message to display to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// The widgets offered by the menu, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    WhatToEat,
    WoodenFish,
    Calculator,
}

impl Widget {
    pub const ALL: [Widget; 3] = [Widget::WhatToEat, Widget::WoodenFish, Widget::Calculator];

    pub fn name(&self) -> &'static str {
        match self {
            Widget::WhatToEat => "今天吃什么",
            Widget::WoodenFish => "电子木鱼",
            Widget::Calculator => "计算器",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Widget::WhatToEat => "随机选择美食，解决选择困难症",
            Widget::WoodenFish => "敲击木鱼，积累功德",
            Widget::Calculator => "简洁好用的计算工具",
        }
    }
}

/// Which panel fills the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Menu,
    Open(Widget),
}

/// Application UI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Input(InputKind),
}

/// Types of input prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    FoodName,
    ConfirmReset,
}

impl InputKind {
    pub fn label(&self) -> &'static str {
        match self {
            InputKind::FoodName => "Food",
            InputKind::ConfirmReset => "Clear all merit?",
        }
    }
}

/// Pure application state - the single source of truth.
pub struct Model {
    // Shell
    pub screen: Screen,
    pub menu_selected: usize,
    pub mode: Mode,
    pub notification: Option<Notification>,
    pub show_keymap: bool,
    pub dark_mode: bool,

    // Input state
    pub input_buffer: String,
    pub pending_category: String,

    // Calculator lives only while its widget is open
    pub calculator: Option<CalculatorState>,
    pub keypad_focus: KeypadFocus,

    // What to eat
    pub food: FoodPicker,
    pub food_selected: usize,
    pub show_history: bool,

    // Wooden fish
    pub fish: WoodenFish,

    // Clock, refreshed by ticks
    pub now: Instant,
    pub today: NaiveDate,

    pub rng: StdRng,

    // Dirty flag - set when state changes and render is needed
    pub dirty: bool,
}

impl Model {
    pub fn new(config: &Config, food: FoodPicker, fish: WoodenFish, rng: StdRng) -> Self {
        Self {
            screen: Screen::default(),
            menu_selected: 0,
            mode: Mode::default(),
            notification: None,
            show_keymap: false,
            dark_mode: config.dark_mode,
            input_buffer: String::new(),
            pending_category: DEFAULT_CATEGORY.to_string(),
            calculator: None,
            keypad_focus: KeypadFocus::default(),
            food,
            food_selected: 0,
            show_history: false,
            today: fish.date(),
            fish,
            now: Instant::now(),
            rng,
            dirty: true,
        }
    }

    /// Build the model from persisted widget blobs.
    pub fn load(config: &Config, store: &Store) -> Self {
        let today = chrono::Local::now().date_naive();
        let food = FoodPicker::from_blob(store.load::<FoodBlob>(food::STORE_KEY));
        let fish = WoodenFish::from_blob(
            store.load::<FishBlob>(fish::STORE_KEY),
            today,
            config.sound,
        );
        Self::new(config, food, fish, StdRng::from_entropy())
    }

    pub fn selected_widget(&self) -> Widget {
        Widget::ALL[self.menu_selected % Widget::ALL.len()]
    }

    /// Create an immutable snapshot for the render thread.
    pub fn snapshot(&self) -> RenderState {
        let calculator = self.calculator.as_ref().map(|calc| CalculatorView {
            display: present_display(calc.display()),
            pending: pending_line(calc),
            focus: self.keypad_focus,
        });

        let food = FoodView {
            foods: self.food.foods().to_vec(),
            selected: self.food_selected,
            history: self.food.history().to_vec(),
            show_history: self.show_history,
            result: self.food.result().map(str::to_string),
            spinning: self.food.is_spinning(),
        };

        let fish = FishView {
            merit: self.fish.merit(),
            today_merit: self.fish.today_merit(),
            sound_enabled: self.fish.sound_enabled(),
            struck: self.fish.is_struck(self.now),
            floating: self
                .fish
                .floating()
                .iter()
                .map(|f| FloatView {
                    text: f.text,
                    x_offset: f.x_offset,
                    progress: f.progress(self.now),
                })
                .collect(),
        };

        RenderState {
            version: next_version(),
            screen: self.screen,
            menu_selected: self.menu_selected,
            mode: self.mode,
            input_buffer: self.input_buffer.clone(),
            pending_category: self.pending_category.clone(),
            notification: self.notification.clone(),
            show_keymap: self.show_keymap,
            dark_mode: self.dark_mode,
            calculator,
            food,
            fish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::Digit;
    use tempfile::TempDir;

    fn test_model() -> Model {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        Model::new(
            &Config::default(),
            FoodPicker::default(),
            WoodenFish::new(today, true),
            StdRng::seed_from_u64(1),
        )
    }

    #[test]
    fn test_new_model_starts_on_menu() {
        let model = test_model();
        assert_eq!(model.screen, Screen::Menu);
        assert_eq!(model.mode, Mode::Normal);
        assert!(model.calculator.is_none());
        assert!(model.dark_mode);
        assert_eq!(model.pending_category, DEFAULT_CATEGORY);
        assert_eq!(model.today, model.fish.date());
    }

    #[test]
    fn test_selected_widget_follows_menu_order() {
        let mut model = test_model();
        assert_eq!(model.selected_widget(), Widget::WhatToEat);
        model.menu_selected = 2;
        assert_eq!(model.selected_widget(), Widget::Calculator);
    }

    #[test]
    fn test_widget_labels() {
        assert_eq!(Widget::Calculator.name(), "计算器");
        assert!(Widget::ALL.iter().all(|w| !w.description().is_empty()));
    }

    #[test]
    fn test_input_kind_label() {
        assert_eq!(InputKind::FoodName.label(), "Food");
        assert_eq!(InputKind::ConfirmReset.label(), "Clear all merit?");
    }

    #[test]
    fn test_snapshot_presents_calculator() {
        let mut model = test_model();
        assert!(model.snapshot().calculator.is_none());

        let mut calc = CalculatorState::new();
        for _ in 0..13 {
            calc = calc.input_digit(Digit::new(9).unwrap());
        }
        model.calculator = Some(calc);

        let view = model.snapshot().calculator.unwrap();
        assert_eq!(view.display, "1.000000e+13");
        assert!(view.pending.is_none());
    }

    #[test]
    fn test_snapshot_versions_increase() {
        let model = test_model();
        let a = model.snapshot().version;
        let b = model.snapshot().version;
        assert!(b > a);
    }

    #[test]
    fn test_load_from_empty_store_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path());
        let config = Config {
            sound: false,
            ..Config::default()
        };
        let model = Model::load(&config, &store);
        assert_eq!(model.food.foods().len(), food::default_foods().len());
        assert_eq!(model.fish.merit(), 0);
        assert!(!model.fish.sound_enabled());
    }
}
