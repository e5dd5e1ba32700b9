//! Terminal UI rendering for gizmo.
//!
//! Minimal chrome: one title line, the active panel, and a single status line
//! that holds either the keymap legend or the input prompt. Colors come from
//! a two-entry palette picked by the theme flag.
//!
//! This module renders from RenderState (immutable snapshot) - it never
//! mutates application state. This enables the decoupled game loop.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::calculator::{KeypadFocus, KEYPAD};
use crate::render::{CalculatorView, FishView, FloatView, FoodView, RenderState};
use crate::tea::{InputKind, Mode, Notification, NotificationLevel, Screen, Widget};
use crate::util::{display_width, truncate};

// Layout constants
const KEYPAD_CELL_WIDTH: usize = 7;
const FOOD_CATEGORY_WIDTH: usize = 10;
const HISTORY_WIDTH: u16 = 24;
/// Floating text offsets are in pixel units; a terminal column is roughly
/// three of them.
const FLOAT_COLUMNS_PER_UNIT: f32 = 1.0 / 3.0;
const FLOAT_RISE_ROWS: f32 = 6.0;

const FISH_ART: [&str; 5] = [
    r"    ____________    ",
    r"  /   _      _   \  ",
    r" |   (_)    (_)   | ",
    r"  \    \____/    /  ",
    r"    ------------    ",
];

/// Colors for one theme. Selection uses REVERSED so it adapts to the
/// terminal either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Palette {
    text: Color,
    dimmed: Color,
    muted: Color,
    accent: Color,
}

impl Palette {
    fn for_theme(dark_mode: bool) -> Self {
        if dark_mode {
            Self {
                text: Color::White,
                dimmed: Color::Gray,
                muted: Color::DarkGray,
                accent: Color::Rgb(0xF3, 0x03, 0x7E),
            }
        } else {
            Self {
                text: Color::Black,
                dimmed: Color::DarkGray,
                muted: Color::Gray,
                accent: Color::Blue,
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Context-sensitive keymap system
// -----------------------------------------------------------------------------

/// Context for determining which keybindings to display.
/// Derived from RenderState - this is the "view model" for the statusbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapContext {
    Menu,
    Calculator,
    WhatToEat,
    WoodenFish,
    TextInput,
    ResetConfirm,
}

impl KeymapContext {
    /// Derive keymap context from render state.
    pub fn from_render_state(state: &RenderState) -> Self {
        match state.mode {
            Mode::Input(InputKind::ConfirmReset) => KeymapContext::ResetConfirm,
            Mode::Input(InputKind::FoodName) => KeymapContext::TextInput,
            Mode::Normal => match state.screen {
                Screen::Menu => KeymapContext::Menu,
                Screen::Open(Widget::Calculator) => KeymapContext::Calculator,
                Screen::Open(Widget::WhatToEat) => KeymapContext::WhatToEat,
                Screen::Open(Widget::WoodenFish) => KeymapContext::WoodenFish,
            },
        }
    }
}

/// A single keybinding entry for display.
struct Keybinding(&'static str, &'static str);

/// A group of related keybindings (separated by │).
struct KeybindingGroup(Vec<Keybinding>);

/// Get keybindings for a given context.
fn keybindings_for_context(ctx: KeymapContext) -> Vec<KeybindingGroup> {
    match ctx {
        KeymapContext::Menu => vec![
            KeybindingGroup(vec![Keybinding("j/k", "move"), Keybinding("Enter", "open")]),
            KeybindingGroup(vec![Keybinding("1-3", "jump"), Keybinding("t", "theme")]),
            KeybindingGroup(vec![Keybinding("q", "quit")]),
        ],
        KeymapContext::Calculator => vec![
            KeybindingGroup(vec![
                Keybinding("0-9 . + - * / %", "input"),
                Keybinding("Enter", "equals"),
            ]),
            KeybindingGroup(vec![Keybinding("Esc", "clear"), Keybinding("⌫", "delete")]),
            KeybindingGroup(vec![
                Keybinding("arrows", "focus"),
                Keybinding("Space", "press"),
            ]),
            KeybindingGroup(vec![Keybinding("q", "back")]),
        ],
        KeymapContext::WhatToEat => vec![
            KeybindingGroup(vec![Keybinding("Space", "spin"), Keybinding("h", "history")]),
            KeybindingGroup(vec![
                Keybinding("j/k", "select"),
                Keybinding("a", "add"),
                Keybinding("d", "remove"),
            ]),
            KeybindingGroup(vec![Keybinding("q", "back")]),
        ],
        KeymapContext::WoodenFish => vec![
            KeybindingGroup(vec![Keybinding("Space", "knock"), Keybinding("s", "sound")]),
            KeybindingGroup(vec![Keybinding("r", "reset")]),
            KeybindingGroup(vec![Keybinding("q", "back")]),
        ],
        KeymapContext::TextInput => vec![KeybindingGroup(vec![
            Keybinding("Enter", "submit"),
            Keybinding("Tab", "category"),
            Keybinding("Esc", "cancel"),
        ])],
        KeymapContext::ResetConfirm => vec![KeybindingGroup(vec![
            Keybinding("y", "clear"),
            Keybinding("n", "cancel"),
        ])],
    }
}

/// Main render function - entry point for all UI drawing.
/// Takes an immutable RenderState snapshot.
pub fn draw(frame: &mut Frame, state: &RenderState) {
    let palette = Palette::for_theme(state.dark_mode);
    let area = frame.area();

    if area.height < 3 {
        render_statusbar(frame, state, palette, area);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, state, palette, chunks[0]);
    match state.screen {
        Screen::Menu => render_menu(frame, state, palette, chunks[1]),
        Screen::Open(Widget::Calculator) => {
            if let Some(ref calc) = state.calculator {
                render_calculator(frame, calc, palette, chunks[1]);
            }
        }
        Screen::Open(Widget::WhatToEat) => render_food(frame, &state.food, palette, chunks[1]),
        Screen::Open(Widget::WoodenFish) => render_fish(frame, &state.fish, palette, chunks[1]),
    }
    render_statusbar(frame, state, palette, chunks[2]);

    // Render notification if present
    if let Some(ref notification) = state.notification {
        render_notification(frame, notification, area);
    }
}

fn render_title(frame: &mut Frame, state: &RenderState, palette: Palette, area: Rect) {
    let mut spans = vec![Span::styled(
        "gizmo",
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    )];
    if let Screen::Open(widget) = state.screen {
        spans.push(Span::styled(" / ", Style::default().fg(palette.muted)));
        spans.push(Span::styled(widget.name(), Style::default().fg(palette.text)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// -----------------------------------------------------------------------------
// Menu
// -----------------------------------------------------------------------------

fn render_menu(frame: &mut Frame, state: &RenderState, palette: Palette, area: Rect) {
    let mut lines: Vec<Line> = vec![Line::default()];
    for (idx, widget) in Widget::ALL.iter().enumerate() {
        let selected = idx == state.menu_selected;
        let (name_style, desc_style) = if selected {
            let s = Style::default().add_modifier(Modifier::REVERSED);
            (s, s)
        } else {
            (
                Style::default().fg(palette.text),
                Style::default().fg(palette.dimmed),
            )
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", idx + 1), Style::default().fg(palette.muted)),
            Span::styled(format!(" {} ", widget.name()), name_style),
            Span::styled("  ", Style::default()),
            Span::styled(widget.description(), desc_style),
        ]));
        lines.push(Line::default());
    }
    frame.render_widget(Paragraph::new(lines), area);
}

// -----------------------------------------------------------------------------
// Calculator
// -----------------------------------------------------------------------------

fn render_calculator(frame: &mut Frame, calc: &CalculatorView, palette: Palette, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    let pending = calc.pending.clone().unwrap_or_default();
    lines.push(Line::from(Span::styled(
        pending,
        Style::default().fg(palette.dimmed),
    )));
    lines.push(Line::from(Span::styled(
        calc.display.clone(),
        Style::default()
            .fg(palette.text)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::default());

    for line in keypad_lines(calc.focus, palette) {
        lines.push(line);
    }

    let width = (KEYPAD_CELL_WIDTH * KEYPAD[0].len()) as u16;
    let panel = centered(area, width, lines.len() as u16);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Right), panel);
}

fn keypad_lines(focus: KeypadFocus, palette: Palette) -> Vec<Line<'static>> {
    KEYPAD
        .iter()
        .enumerate()
        .map(|(row, labels)| {
            let spans: Vec<Span> = labels
                .iter()
                .enumerate()
                .map(|(col, label)| {
                    let style = if focus == (KeypadFocus { row, col }) {
                        Style::default().add_modifier(Modifier::REVERSED)
                    } else if matches!(*label, "÷" | "×" | "-" | "+" | "=") {
                        Style::default().fg(palette.accent)
                    } else {
                        Style::default().fg(palette.text)
                    };
                    Span::styled(keypad_cell(label), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Center a label in a fixed-width keypad cell.
fn keypad_cell(label: &str) -> String {
    format!("{:^width$}", label, width = KEYPAD_CELL_WIDTH)
}

// -----------------------------------------------------------------------------
// What to eat
// -----------------------------------------------------------------------------

fn render_food(frame: &mut Frame, food: &FoodView, palette: Palette, area: Rect) {
    let chunks = Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).split(area);

    let headline = match (&food.result, food.spinning) {
        (Some(name), true) => Line::from(Span::styled(
            name.clone(),
            Style::default().fg(palette.dimmed),
        )),
        (Some(name), false) => Line::from(vec![
            Span::styled("今天吃 ", Style::default().fg(palette.dimmed)),
            Span::styled(
                name.clone(),
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        (None, _) => Line::from(Span::styled(
            "Space 转一转",
            Style::default().fg(palette.muted),
        )),
    };
    frame.render_widget(
        Paragraph::new(vec![Line::default(), headline]).alignment(Alignment::Center),
        chunks[0],
    );

    let (list_area, history_area) = if food.show_history && chunks[1].width > HISTORY_WIDTH + 10 {
        let cols = Layout::horizontal([Constraint::Fill(1), Constraint::Length(HISTORY_WIDTH)])
            .split(chunks[1]);
        (cols[0], Some(cols[1]))
    } else {
        (chunks[1], None)
    };

    render_food_list(frame, food, palette, list_area);
    if let Some(history_area) = history_area {
        render_food_history(frame, food, palette, history_area);
    }
}

/// Food list with scrolloff navigation: selection stays centered.
fn render_food_list(frame: &mut Frame, food: &FoodView, palette: Palette, area: Rect) {
    if food.foods.is_empty() {
        let msg = Line::from(Span::styled(
            "No foods. Press 'a' to add one.",
            Style::default().fg(palette.dimmed),
        ));
        frame.render_widget(Paragraph::new(msg), area);
        return;
    }

    let height = area.height as usize;
    let center = height / 2;
    let start = food.selected.saturating_sub(center);
    let end = (start + height).min(food.foods.len());
    let start = end.saturating_sub(height);

    let name_width = (area.width as usize).saturating_sub(FOOD_CATEGORY_WIDTH + 2);
    let lines: Vec<Line> = food
        .foods
        .iter()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(idx, f)| {
            let (name_style, category_style) = if idx == food.selected {
                let s = Style::default().add_modifier(Modifier::REVERSED);
                (s, s)
            } else {
                (
                    Style::default().fg(palette.text),
                    Style::default().fg(palette.muted),
                )
            };
            Line::from(vec![
                Span::styled(pad(&truncate(&f.name, name_width), name_width), name_style),
                Span::styled("  ", name_style),
                Span::styled(
                    pad(&truncate(&f.category, FOOD_CATEGORY_WIDTH), FOOD_CATEGORY_WIDTH),
                    category_style,
                ),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_food_history(frame: &mut Frame, food: &FoodView, palette: Palette, area: Rect) {
    let mut lines = vec![Line::from(Span::styled(
        "历史",
        Style::default()
            .fg(palette.dimmed)
            .add_modifier(Modifier::BOLD),
    ))];
    if food.history.is_empty() {
        lines.push(Line::from(Span::styled(
            "-",
            Style::default().fg(palette.muted),
        )));
    }
    for (idx, name) in food.history.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("{:>2} ", idx + 1), Style::default().fg(palette.muted)),
            Span::styled(name.clone(), Style::default().fg(palette.text)),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

/// Pad to a display width, counting wide glyphs as two columns.
fn pad(s: &str, width: usize) -> String {
    let used = display_width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(used)))
}

// -----------------------------------------------------------------------------
// Wooden fish
// -----------------------------------------------------------------------------

fn render_fish(frame: &mut Frame, fish: &FishView, palette: Palette, area: Rect) {
    let chunks = Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).split(area);

    let sound = if fish.sound_enabled { "♪ on" } else { "♪ off" };
    let counters = Line::from(vec![
        Span::styled("功德 ", Style::default().fg(palette.dimmed)),
        Span::styled(
            fish.merit.to_string(),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   今日 ", Style::default().fg(palette.dimmed)),
        Span::styled(fish.today_merit.to_string(), Style::default().fg(palette.text)),
        Span::styled(format!("   {}", sound), Style::default().fg(palette.muted)),
    ]);
    frame.render_widget(
        Paragraph::new(vec![Line::default(), counters]).alignment(Alignment::Center),
        chunks[0],
    );

    let art_width = FISH_ART[0].len() as u16;
    let art_height = FISH_ART.len() as u16;
    let mut art_area = centered(chunks[1], art_width, art_height);
    // Struck: the fish dips one row, like the scale(0.95) press.
    let art_style = if fish.struck {
        art_area.y = (art_area.y + 1).min(chunks[1].bottom().saturating_sub(art_height));
        Style::default().fg(palette.accent)
    } else {
        Style::default().fg(palette.text)
    };
    let art: Vec<Line> = FISH_ART
        .iter()
        .map(|row| Line::from(Span::styled(*row, art_style)))
        .collect();
    frame.render_widget(Paragraph::new(art), art_area);

    for float in &fish.floating {
        if let Some(rect) = float_rect(float, art_area, chunks[1]) {
            let color = if float.progress < 0.6 {
                palette.accent
            } else {
                palette.muted
            };
            frame.render_widget(
                Paragraph::new(Span::styled(float.text, Style::default().fg(color))),
                rect,
            );
        }
    }
}

/// Where a floating text sits: starts just above the fish and rises as it
/// ages. None once it would leave the panel.
fn float_rect(float: &FloatView, art: Rect, bounds: Rect) -> Option<Rect> {
    let width = Line::from(float.text).width() as u16;
    let rise = (float.progress * FLOAT_RISE_ROWS).round() as u16;
    let y = art.y.checked_sub(1 + rise)?;
    if y < bounds.y {
        return None;
    }

    let center = art.x as f32 + art.width as f32 / 2.0;
    let x = center + float.x_offset * FLOAT_COLUMNS_PER_UNIT - width as f32 / 2.0;
    let max_x = bounds.right().saturating_sub(width);
    let x = (x.max(bounds.x as f32) as u16).min(max_x);

    Some(Rect {
        x,
        y,
        width: width.min(bounds.width),
        height: 1,
    })
}

// -----------------------------------------------------------------------------
// Status line
// -----------------------------------------------------------------------------

/// Shows either:
/// - Input prompt (when in Input mode - no '?' shown)
/// - "?" indicator only (when keymap is collapsed)
/// - "? │ <full keymap>" (when keymap is expanded via '?' toggle)
fn render_statusbar(frame: &mut Frame, state: &RenderState, palette: Palette, area: Rect) {
    let line = match state.mode {
        Mode::Input(kind) => render_input_line(state, kind, palette),
        Mode::Normal => render_keymap_line(state, palette),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_keymap_line(state: &RenderState, palette: Palette) -> Line<'static> {
    let ctx = KeymapContext::from_render_state(state);
    let groups = keybindings_for_context(ctx);

    let key_style = Style::default().fg(palette.dimmed);
    let desc_style = Style::default().fg(palette.muted);
    let sep_style = Style::default().fg(palette.muted);

    let help_style = if state.show_keymap {
        Style::default().fg(palette.text)
    } else {
        Style::default().fg(palette.muted)
    };
    let mut spans: Vec<Span> = vec![Span::styled("?", help_style)];

    if state.show_keymap {
        for group in groups.iter() {
            spans.push(Span::styled(" │ ", sep_style));
            for (key_idx, keybinding) in group.0.iter().enumerate() {
                if key_idx > 0 {
                    spans.push(Span::styled(" • ", sep_style));
                }
                spans.push(Span::styled(keybinding.0, key_style));
                spans.push(Span::styled(format!(" {}", keybinding.1), desc_style));
            }
        }
    }

    Line::from(spans)
}

/// Input prompt for the bottom line (replaces keymap when in input mode).
fn render_input_line(state: &RenderState, kind: InputKind, palette: Palette) -> Line<'static> {
    let hint_style = Style::default().fg(palette.muted);
    let label_style = Style::default().fg(palette.text);
    let input_style = Style::default().fg(palette.text);
    let cursor_style = Style::default()
        .fg(palette.text)
        .add_modifier(Modifier::SLOW_BLINK);

    match kind {
        InputKind::ConfirmReset => Line::from(vec![
            Span::styled("y • n  ", hint_style),
            Span::styled(kind.label(), label_style),
        ]),
        InputKind::FoodName => Line::from(vec![
            Span::styled("Enter • Tab • Esc  ", hint_style),
            Span::styled(format!("[{}] ", state.pending_category), hint_style),
            Span::styled(format!("{}: ", kind.label()), label_style),
            Span::styled(state.input_buffer.clone(), input_style),
            Span::styled("_", cursor_style),
        ]),
    }
}

/// Render notification message on the bottom line of the screen.
///
/// - Error: Red text with "Error:" prefix and bold styling
/// - Info: Green text without prefix
fn render_notification(frame: &mut Frame, notification: &Notification, area: Rect) {
    let notification_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    frame.render_widget(Clear, notification_area);

    let line = match notification.level {
        NotificationLevel::Error => Line::from(vec![
            Span::styled(
                "Error: ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                notification.message.clone(),
                Style::default().fg(Color::Red),
            ),
        ]),
        NotificationLevel::Info => Line::from(Span::styled(
            notification.message.clone(),
            Style::default().fg(Color::Green),
        )),
    };

    frame.render_widget(Paragraph::new(line), notification_area);
}

/// A `width` x `height` rect centered in `area`, clipped to it.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
