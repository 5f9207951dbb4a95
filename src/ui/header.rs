use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use super::theme;

const SPARKLE_CHARS: &[char] = &['.', '+', '*', '✦', '*', '+', '.', ' '];

pub const HEADER_HEIGHT: u16 = 5;
pub const HINT: &str =
    "Hint: Try \"Metals associated with Venus\" or \"Plant attributions to Jupiter in Christian Astrology\".";

pub fn draw_header(f: &mut Frame, area: Rect, app: &crate::app::App) {
    let tick = app.tick as usize;

    // Sparkle animation: cycle through characters at different phases
    let left_sparkle = SPARKLE_CHARS[tick / 3 % SPARKLE_CHARS.len()];
    let right_sparkle = SPARKLE_CHARS[(tick / 3 + 4) % SPARKLE_CHARS.len()];

    let lines = vec![
        Line::from(vec![
            Span::styled(format!("{}  ", left_sparkle), theme::glow_style()),
            Span::styled("A s t r o S c h o l a r", theme::title_style()),
            Span::styled(format!("  {}", right_sparkle), theme::glow_style()),
        ]),
        Line::from(Span::styled(
            "Historical Astrology Research Assistant",
            theme::subtitle_style(),
        )),
        Line::from(""),
        Line::from(Span::styled("What would you like to know?", theme::prompt_style())),
        Line::from(Span::styled(HINT, theme::hint_style())),
    ];

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}
