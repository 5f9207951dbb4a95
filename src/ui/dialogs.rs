use super::answers::wrap_text;
use super::theme;
use crate::app::App;
use crate::types::DialogKind;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use ratatui::Frame;

const MESSAGE_INDENT: u16 = 2;

/// Draw the currently active modal dialog overlay.
pub fn draw_dialog(f: &mut Frame, area: Rect, app: &App) {
    let dialog = match &app.dialog {
        Some(d) => d,
        None => return,
    };

    match dialog {
        DialogKind::Notice { title, body } => {
            draw_message(f, area, title, body, theme::TITLE);
        }
        DialogKind::Error { message } => {
            draw_message(f, area, "Search Failed", message, theme::ERROR);
        }
        DialogKind::Help => {
            draw_help(f, area);
        }
    }
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}

fn dialog_block(title: &str, accent: ratatui::style::Color) -> Block<'static> {
    Block::default()
        .title(Line::from(vec![Span::styled(
            format!(" {} ", title),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )]))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .style(Style::default().bg(theme::SURFACE))
}

fn draw_message(f: &mut Frame, area: Rect, title: &str, body: &str, accent: ratatui::style::Color) {
    // Width does not depend on height, so measure the wrapped body first.
    let inner_width = centered_rect(60, 0, area).width.saturating_sub(2);
    let text_width = inner_width.saturating_sub(MESSAGE_INDENT) as usize;
    let rows: Vec<String> = body
        .lines()
        .flat_map(|l| wrap_text(l.trim(), text_width))
        .collect();

    // Borders, blank above and below the body, and the hint row.
    let height = (rows.len() as u16).saturating_add(5).min(area.height);
    let popup = centered_rect(60, height, area);
    f.render_widget(Clear, popup);

    let block = dialog_block(title, accent);
    let inner = block.inner(popup);
    f.render_widget(block, popup);
    if inner.height == 0 {
        return;
    }

    let indent = " ".repeat(MESSAGE_INDENT as usize);
    let mut lines = vec![Line::from("")];
    lines.extend(rows.into_iter().map(|row| {
        Line::from(Span::styled(format!("{}{}", indent, row), Style::default().fg(theme::TEXT)))
    }));

    // The hint keeps the last row even when a long body has to be cut.
    let body_area = Rect::new(inner.x, inner.y, inner.width, inner.height - 1);
    let hint_area = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);
    f.render_widget(Paragraph::new(lines), body_area);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("  [Enter]", theme::key_hint_style()),
            Span::styled(" OK", theme::footer_style()),
        ])),
        hint_area,
    );
}

fn draw_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 18, area);
    f.render_widget(Clear, popup);

    let block = dialog_block("Help - AstroScholar", theme::TITLE);
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let hl = theme::key_hint_style();
    let nl = Style::default().fg(theme::TEXT);
    let dim = Style::default().fg(theme::TEXT_DIM);
    let heading = theme::panel_title_style();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("  ASKING", heading)),
        Line::from(vec![
            Span::styled("  Enter", hl),
            Span::styled("          Search the stars for your question", nl),
        ]),
        Line::from(vec![
            Span::styled("  Ctrl+U", hl),
            Span::styled("         Clear the question", nl),
        ]),
        Line::from(""),
        Line::from(Span::styled("  ANSWERS", heading)),
        Line::from(vec![
            Span::styled("  ↑/↓", hl),
            Span::styled("            Scroll one line", nl),
        ]),
        Line::from(vec![
            Span::styled("  PgUp/PgDn", hl),
            Span::styled("      Scroll one page", nl),
        ]),
        Line::from(vec![
            Span::styled("  Home/End", hl),
            Span::styled("       Jump to first / last source", nl),
        ]),
        Line::from(vec![
            Span::styled("  Ctrl+Y", hl),
            Span::styled("         Copy answers to the clipboard", nl),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  F1", hl),
            Span::styled(" Help  ", nl),
            Span::styled("Esc", hl),
            Span::styled(" Quit  ", nl),
            Span::styled("Ctrl+C", hl),
            Span::styled(" Force quit", nl),
        ]),
        Line::from(""),
        Line::from(Span::styled("  Press any key to close", dim)),
    ];

    f.render_widget(Paragraph::new(lines), inner);
}
