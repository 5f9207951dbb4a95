use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme;
use crate::app::{AnswerView, App};
use crate::llm::Answer;
use crate::starfield::{BufferCanvas, Canvas, Point, Rgba};

const MAX_CARD_WIDTH: u16 = 100;
/// Columns between the card outline and its text.
const CARD_PAD_X: u16 = 2;
const CARD_GAP: usize = 1;
/// Black at 100/255 over the sky behind each card.
const CARD_SHADE: Rgba = Rgba::rgb(0, 0, 0).with_alpha(100);

/// One laid-out answer card. The first and last rows carry the outline.
struct Card {
    lines: Vec<Line<'static>>,
}

impl Card {
    fn build(answer: &Answer, text_width: usize) -> Self {
        let mut lines = vec![Line::from("")];
        for row in wrap_text(&answer.source_label(), text_width) {
            lines.push(Line::from(Span::styled(row, theme::source_style())));
        }
        lines.push(Line::from(""));
        for row in wrap_text(answer.info.trim(), text_width) {
            lines.push(Line::from(Span::styled(row, theme::info_style())));
        }
        lines.push(Line::from(""));
        Self { lines }
    }

    fn height(&self) -> usize {
        self.lines.len()
    }
}

pub fn draw_answers(f: &mut Frame, area: Rect, app: &App) {
    if area.width == 0 || area.height == 0 || app.answers.is_empty() {
        app.answer_view.set(AnswerView::default());
        return;
    }

    let width = MAX_CARD_WIDTH.min(area.width);
    let area = Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height);
    let inset = 1 + CARD_PAD_X;
    let text_area = Rect::new(
        area.x + inset,
        area.y,
        area.width.saturating_sub(inset * 2).max(1),
        area.height,
    );
    let text_width = text_area.width as usize;

    let cards: Vec<Card> = app.answers.iter().map(|a| Card::build(a, text_width)).collect();

    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut spans: Vec<(usize, usize)> = Vec::with_capacity(cards.len());
    for (i, card) in cards.into_iter().enumerate() {
        if i > 0 {
            lines.extend(std::iter::repeat(Line::from("")).take(CARD_GAP));
        }
        spans.push((lines.len(), card.height()));
        lines.extend(card.lines);
    }

    let view = AnswerView {
        total: lines.len(),
        visible: area.height as usize,
    };
    app.answer_view.set(view);
    let scroll = app.answer_scroll.min(view.max_scroll());

    // Shade and outline the visible part of each card before the text goes on top.
    for (start, height) in spans {
        let top = start.max(scroll);
        let bottom = (start + height).min(scroll + view.visible);
        if top >= bottom {
            continue;
        }
        let rows = Rect::new(area.x, area.y + (top - scroll) as u16, area.width, (bottom - top) as u16);
        let mut canvas = BufferCanvas::new(f.buffer_mut(), rows);
        let size = canvas.size();
        canvas.fill_rect(Point::ORIGIN, size, CARD_SHADE);

        for row in top..bottom {
            let edge = if row == start {
                Edge::Top
            } else if row + 1 == start + height {
                Edge::Bottom
            } else {
                Edge::Side
            };
            draw_outline_row(f.buffer_mut(), area.x, area.y + (row - scroll) as u16, area.width, edge);
        }
    }

    f.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), text_area);
}

#[derive(Clone, Copy)]
enum Edge {
    Top,
    Side,
    Bottom,
}

/// Rounded card outline, one row at a time so partly scrolled cards still close.
fn draw_outline_row(buf: &mut Buffer, x: u16, y: u16, width: u16, edge: Edge) {
    if width < 2 {
        return;
    }
    let style = Style::default().fg(theme::CARD_BORDER);
    let right = x + width - 1;
    let (left_ch, right_ch) = match edge {
        Edge::Top => ("╭", "╮"),
        Edge::Side => ("│", "│"),
        Edge::Bottom => ("╰", "╯"),
    };
    buf[(x, y)].set_symbol(left_ch).set_style(style);
    buf[(right, y)].set_symbol(right_ch).set_style(style);
    if !matches!(edge, Edge::Side) {
        for col in x + 1..right {
            buf[(col, y)].set_symbol("─").set_style(style);
        }
    }
}

/// Greedy word wrap by display width; words wider than a row are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for paragraph in text.lines() {
        let mut row = String::new();
        let mut row_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            let sep = usize::from(!row.is_empty());

            if row_width + sep + word_width <= width {
                if sep == 1 {
                    row.push(' ');
                }
                row.push_str(word);
                row_width += sep + word_width;
                continue;
            }

            if !row.is_empty() {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }

            if word_width <= width {
                row.push_str(word);
                row_width = word_width;
                continue;
            }

            for ch in word.chars() {
                let w = ch.width().unwrap_or(0);
                if row_width + w > width && !row.is_empty() {
                    rows.push(std::mem::take(&mut row));
                    row_width = 0;
                }
                row.push(ch);
                row_width += w;
            }
        }

        rows.push(row);
    }

    if rows.is_empty() {
        rows.push(String::new());
    }
    rows
}
