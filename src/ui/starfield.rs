use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use ratatui::Frame;

use crate::starfield::{BufferCanvas, StarField};

pub fn draw_starfield(f: &mut Frame, area: Rect, field: &StarField) {
    let widget = StarfieldWidget { field };
    f.render_widget(widget, area);
}

struct StarfieldWidget<'a> {
    field: &'a StarField,
}

impl Widget for StarfieldWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let mut canvas = BufferCanvas::new(buf, area);
        self.field.render(&mut canvas);
    }
}
