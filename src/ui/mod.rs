pub mod answers;
pub mod dialogs;
pub mod header;
pub mod layout;
pub mod question;
pub mod starfield;
pub mod theme;

use crate::app::App;
use ratatui::Frame;

/// Master render function: draws the sky, the layout, then any modal overlay.
pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    // Layer 0: starfield background
    starfield::draw_starfield(f, area, &app.sky);

    // Layer 1: header, question and answers
    layout::draw_layout(f, area, app);

    // Layer 2: modal dialog overlay (if any)
    if app.dialog.is_some() {
        dialogs::draw_dialog(f, area, app);
    }
}
