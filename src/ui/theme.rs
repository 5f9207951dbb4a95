use ratatui::style::{Color, Modifier, Style};

use crate::types::SearchState;

// ── Base palette ────────────────────────────────────────────────
pub const SURFACE: Color = Color::Rgb(18, 12, 34);
pub const BORDER: Color = Color::Rgb(90, 80, 120);
pub const BORDER_FOCUS: Color = Color::Rgb(255, 226, 122);
/// White at 50/255 over the night sky.
pub const CARD_BORDER: Color = Color::Rgb(58, 54, 70);

pub const TEXT: Color = Color::Rgb(235, 235, 235);
pub const TEXT_DIM: Color = Color::Rgb(150, 145, 170);

pub const TITLE: Color = Color::Rgb(0xFF, 0xE2, 0x7A);
pub const GLOW: Color = Color::Rgb(0xF5, 0xF1, 0x07);
pub const PROMPT: Color = Color::Rgb(0xFF, 0xCC, 0x66);
pub const SOURCE: Color = Color::Rgb(192, 192, 192);
pub const INFO: Color = Color::Rgb(0xD4, 0xA4, 0x5A);

pub const SUCCESS: Color = Color::Rgb(120, 220, 140);
pub const ERROR: Color = Color::Rgb(255, 90, 90);

// ── Composite styles ────────────────────────────────────────────
pub fn title_style() -> Style {
    Style::default().fg(TITLE).add_modifier(Modifier::BOLD)
}

pub fn glow_style() -> Style {
    Style::default().fg(GLOW).add_modifier(Modifier::BOLD)
}

pub fn subtitle_style() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn prompt_style() -> Style {
    Style::default().fg(PROMPT).add_modifier(Modifier::BOLD)
}

pub fn hint_style() -> Style {
    Style::default().fg(TEXT)
}

pub fn placeholder_style() -> Style {
    Style::default().fg(TEXT_DIM).add_modifier(Modifier::ITALIC)
}

pub fn source_style() -> Style {
    Style::default().fg(SOURCE).add_modifier(Modifier::BOLD)
}

pub fn info_style() -> Style {
    Style::default().fg(INFO).add_modifier(Modifier::BOLD)
}

pub fn panel_title_style() -> Style {
    Style::default().fg(TITLE).add_modifier(Modifier::BOLD)
}

pub fn key_hint_style() -> Style {
    Style::default().fg(PROMPT).add_modifier(Modifier::BOLD)
}

pub fn status_style(state: SearchState) -> Style {
    match state {
        SearchState::Idle => Style::default().fg(TEXT_DIM),
        SearchState::Searching => Style::default().fg(GLOW).add_modifier(Modifier::BOLD),
        SearchState::Answered => Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD),
        SearchState::Failed => Style::default().fg(ERROR).add_modifier(Modifier::BOLD),
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(BORDER_FOCUS)
    } else {
        Style::default().fg(BORDER)
    }
}

pub fn footer_style() -> Style {
    Style::default().fg(TEXT_DIM)
}
