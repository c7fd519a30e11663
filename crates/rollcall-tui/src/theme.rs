//! Colors and styles for the attendance board.

use ratatui::style::{Color, Modifier, Style};

// Palette

pub const ACCENT: Color = Color::Rgb(97, 175, 239); // #61afef
pub const FOCUS: Color = Color::Rgb(198, 120, 221); // #c678dd
pub const PRESENT: Color = Color::Rgb(152, 195, 121); // #98c379
pub const ABSENT: Color = Color::Rgb(224, 108, 117); // #e06c75
pub const WARNING: Color = Color::Rgb(229, 192, 123); // #e5c07b
pub const FOREGROUND: Color = Color::Rgb(171, 178, 191); // #abb2bf
pub const MUTED: Color = Color::Rgb(92, 99, 112); // #5c6370
pub const SURFACE: Color = Color::Rgb(44, 49, 58); // #2c313a

pub fn title_style() -> Style {
    Style::new().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::new().fg(FOCUS)
}

pub fn border_default() -> Style {
    Style::new().fg(MUTED)
}

/// Department header cells.
pub fn table_header() -> Style {
    Style::new().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Cursor row in the department picker.
pub fn table_selected() -> Style {
    Style::new().fg(FOCUS).bg(SURFACE).add_modifier(Modifier::BOLD)
}

pub fn present() -> Style {
    Style::new().fg(PRESENT)
}

pub fn absent() -> Style {
    Style::new().fg(ABSENT)
}

/// Unknown presence and padding cells.
pub fn placeholder() -> Style {
    Style::new().fg(MUTED)
}

pub fn banner() -> Style {
    Style::new().fg(WARNING).bg(SURFACE).add_modifier(Modifier::BOLD)
}

pub fn error_text() -> Style {
    Style::new().fg(ABSENT).add_modifier(Modifier::BOLD)
}

pub fn key_hint() -> Style {
    Style::new().fg(MUTED)
}

pub fn key_hint_key() -> Style {
    Style::new().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn text() -> Style {
    Style::new().fg(FOREGROUND)
}
