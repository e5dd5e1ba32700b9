use crate::calculator::KeypadFocus;
use crate::food::Food;
use crate::tea::{Mode, Notification, Screen};
use std::sync::atomic::{AtomicU64, Ordering};

/// Calculator as it should appear: the display already switched to
/// exponential form when it is too wide.
#[derive(Debug, Clone)]
pub struct CalculatorView {
    pub display: String,
    /// "12 ×" while an operation is pending.
    pub pending: Option<String>,
    pub focus: KeypadFocus,
}

#[derive(Debug, Clone, Default)]
pub struct FoodView {
    pub foods: Vec<Food>,
    pub selected: usize,
    pub history: Vec<String>,
    pub show_history: bool,
    /// Current wheel face while spinning, the pick once stopped.
    pub result: Option<String>,
    pub spinning: bool,
}

#[derive(Debug, Clone)]
pub struct FloatView {
    pub text: &'static str,
    pub x_offset: f32,
    /// 0.0 at spawn, 1.0 when about to vanish.
    pub progress: f32,
}

#[derive(Debug, Clone, Default)]
pub struct FishView {
    pub merit: u64,
    pub today_merit: u64,
    pub sound_enabled: bool,
    pub struck: bool,
    pub floating: Vec<FloatView>,
}

static VERSION_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn next_version() -> u64 {
    VERSION_COUNTER.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone)]
pub struct RenderState {
    pub version: u64,
    pub screen: Screen,
    pub menu_selected: usize,
    pub mode: Mode,
    pub input_buffer: String,
    pub pending_category: String,
    pub notification: Option<Notification>,
    /// Whether the keymap legend is expanded (toggled by '?')
    pub show_keymap: bool,
    pub dark_mode: bool,
    /// None unless the calculator is open.
    pub calculator: Option<CalculatorView>,
    pub food: FoodView,
    pub fish: FishView,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            version: 0,
            screen: Screen::Menu,
            menu_selected: 0,
            mode: Mode::Normal,
            input_buffer: String::new(),
            pending_category: String::new(),
            notification: None,
            show_keymap: false,
            dark_mode: true,
            calculator: None,
            food: FoodView::default(),
            fish: FishView::default(),
        }
    }
}
