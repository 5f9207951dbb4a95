use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthChar;

use super::theme;
use crate::app::App;
use crate::types::SearchState;

pub const PLACEHOLDER: &str = "Ask me a question about Astrology...";
/// Input box plus the button/status line under it.
pub const QUESTION_HEIGHT: u16 = 4;
const INPUT_WIDTH: u16 = 64;
const SPINNER: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub fn draw_question(f: &mut Frame, area: Rect, app: &App) {
    let width = INPUT_WIDTH.min(area.width);
    let x = area.x + (area.width - width) / 2;
    let input_area = Rect::new(x, area.y, width, area.height.min(3));

    let searching = app.search == SearchState::Searching;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_style(!searching))
        .style(Style::default().bg(theme::SURFACE));
    let inner = block.inner(input_area);
    f.render_widget(block, input_area);

    let cursor_on = app.dialog.is_none() && (app.tick / 6) % 2 == 0;
    let cursor = if cursor_on { "█" } else { " " };

    let line = if app.question.is_empty() {
        Line::from(vec![
            Span::styled(cursor, Style::default().fg(theme::TITLE)),
            Span::styled(PLACEHOLDER, theme::placeholder_style()),
        ])
    } else {
        let room = (inner.width as usize).saturating_sub(1);
        Line::from(vec![
            Span::styled(visible_tail(&app.question, room), Style::default().fg(theme::TEXT)),
            Span::styled(cursor, Style::default().fg(theme::TITLE)),
        ])
    };
    f.render_widget(Paragraph::new(line), inner);

    if area.height > 3 {
        let status_area = Rect::new(area.x, area.y + 3, area.width, 1);
        f.render_widget(
            Paragraph::new(status_line(app)).alignment(Alignment::Center),
            status_area,
        );
    }
}

fn status_line(app: &App) -> Line<'static> {
    match app.search {
        SearchState::Searching => {
            let frame = SPINNER[app.tick as usize % SPINNER.len()];
            Line::from(Span::styled(
                format!("{} {}", frame, app.search),
                theme::status_style(app.search),
            ))
        }
        _ => Line::from(vec![
            Span::styled("[Enter] ", theme::key_hint_style()),
            Span::styled("✧ Search the Stars ✧", theme::glow_style()),
        ]),
    }
}

/// The end of `text` that fits in `width` columns, so the cursor stays visible.
pub fn visible_tail(text: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = text.len();
    for (idx, ch) in text.char_indices().rev() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }
    &text[start..]
}
