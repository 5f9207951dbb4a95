use super::header::{self, HEADER_HEIGHT};
use super::question::{self, QUESTION_HEIGHT};
use super::{answers, theme};
use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Header and question block, centred until the first question goes out,
/// then pinned to the top with the answers underneath.
pub fn draw_layout(f: &mut Frame, area: Rect, app: &App) {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let (body, footer) = (vert[0], vert[1]);

    let top_block = HEADER_HEIGHT + 1 + QUESTION_HEIGHT;

    let rows = if app.has_asked {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Length(1),
                Constraint::Length(QUESTION_HEIGHT),
                Constraint::Length(1),
                Constraint::Min(0), // answers
            ])
            .split(body)
    } else {
        let pad = body.height.saturating_sub(top_block) / 2;
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(pad),
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Length(1),
                Constraint::Length(QUESTION_HEIGHT),
                Constraint::Length(0),
                Constraint::Min(0),
            ])
            .split(body)
    };

    header::draw_header(f, rows[1], app);
    question::draw_question(f, rows[3], app);
    answers::draw_answers(f, rows[5], app);
    draw_footer(f, footer, app);
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    // Show flash message if active, otherwise normal footer
    if let Some(msg) = app.active_flash() {
        let footer = Line::from(vec![Span::styled(
            format!(" {} ", msg),
            ratatui::style::Style::default()
                .fg(theme::SUCCESS)
                .add_modifier(Modifier::BOLD),
        )]);
        f.render_widget(Paragraph::new(footer), area);
        return;
    }

    let mut spans = vec![
        Span::styled(" [Enter]", theme::key_hint_style()),
        Span::styled(" Search  ", theme::footer_style()),
    ];
    if !app.answers.is_empty() {
        spans.extend([
            Span::styled("[↑↓ PgUp PgDn]", theme::key_hint_style()),
            Span::styled(" Scroll  ", theme::footer_style()),
            Span::styled("[Ctrl+Y]", theme::key_hint_style()),
            Span::styled(" Copy  ", theme::footer_style()),
        ]);
    }
    spans.extend([
        Span::styled("[Ctrl+U]", theme::key_hint_style()),
        Span::styled(" Clear  ", theme::footer_style()),
        Span::styled("[F1]", theme::key_hint_style()),
        Span::styled(" Help  ", theme::footer_style()),
        Span::styled("[Esc]", theme::key_hint_style()),
        Span::styled(" Quit", theme::footer_style()),
    ]);

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
