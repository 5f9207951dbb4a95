use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier};

use super::geom::{Bounds, Point};

/// Logical pixels covered by one terminal cell.
pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Source-over compositing onto an opaque base colour.
    pub fn over(self, base: (u8, u8, u8)) -> (u8, u8, u8) {
        let t = self.a as f32 / 255.0;
        let mix = |src: u8, dst: u8| -> u8 {
            (dst as f32 + (src as f32 - dst as f32) * t)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        (mix(self.r, base.0), mix(self.g, base.1), mix(self.b, base.2))
    }
}

/// The drawing surface the starfield paints onto.
pub trait Canvas {
    /// Size of the surface in logical pixels.
    fn size(&self) -> Bounds;

    fn fill_rect(&mut self, origin: Point, size: Bounds, color: Rgba);

    /// Plot a single point; `width` is the stroke width in pixels.
    fn plot(&mut self, at: Point, color: Rgba, width: u8);
}

/// Paints onto a ratatui buffer, one cell per 8x16 logical pixels.
pub struct BufferCanvas<'a> {
    buf: &'a mut Buffer,
    area: Rect,
}

impl<'a> BufferCanvas<'a> {
    pub fn new(buf: &'a mut Buffer, area: Rect) -> Self {
        let area = area.intersection(buf.area);
        Self { buf, area }
    }

    fn cell_at(&self, p: Point) -> Option<(u16, u16)> {
        if !p.x.is_finite() || !p.y.is_finite() || p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let col = (p.x / CELL_WIDTH_PX).floor();
        let row = (p.y / CELL_HEIGHT_PX).floor();
        if col >= self.area.width as f64 || row >= self.area.height as f64 {
            return None;
        }
        Some((self.area.x + col as u16, self.area.y + row as u16))
    }

    fn cell_span(start: f64, len: f64, cell: f64, limit: u16) -> (u16, u16) {
        let lo = (start / cell).floor().clamp(0.0, limit as f64) as u16;
        let hi = ((start + len) / cell).ceil().clamp(0.0, limit as f64) as u16;
        (lo, hi)
    }
}

impl Canvas for BufferCanvas<'_> {
    fn size(&self) -> Bounds {
        Bounds::from_cells(self.area.width, self.area.height)
    }

    fn fill_rect(&mut self, origin: Point, size: Bounds, color: Rgba) {
        let (c0, c1) = Self::cell_span(origin.x, size.width, CELL_WIDTH_PX, self.area.width);
        let (r0, r1) = Self::cell_span(origin.y, size.height, CELL_HEIGHT_PX, self.area.height);

        for row in r0..r1 {
            for col in c0..c1 {
                let cell = &mut self.buf[(self.area.x + col, self.area.y + row)];
                let (r, g, b) = color.over(rgb_of(cell.bg));
                if color.a == u8::MAX {
                    cell.reset();
                } else if cell.symbol() != " " {
                    // Translucent fills dim whatever is lit underneath.
                    let (fr, fg, fb) = color.over(rgb_of(cell.fg));
                    cell.set_fg(Color::Rgb(fr, fg, fb));
                }
                cell.set_bg(Color::Rgb(r, g, b));
            }
        }
    }

    fn plot(&mut self, at: Point, color: Rgba, width: u8) {
        if color.a == 0 {
            return;
        }
        let Some(pos) = self.cell_at(at) else {
            return;
        };

        let cell = &mut self.buf[pos];
        // Composite over whatever glyph is already lit here, else over the sky.
        let base = if cell.symbol() == " " {
            rgb_of(cell.bg)
        } else {
            rgb_of(cell.fg)
        };
        let (r, g, b) = color.over(base);

        cell.set_char(glyph(width, color.a));
        cell.set_fg(Color::Rgb(r, g, b));
        if width >= 3 {
            cell.modifier.insert(Modifier::BOLD);
        }
    }
}

fn glyph(width: u8, alpha: u8) -> char {
    if width >= 3 {
        '✦'
    } else if alpha >= 200 {
        '*'
    } else if alpha >= 140 {
        '∙'
    } else {
        '·'
    }
}

fn rgb_of(color: Color) -> (u8, u8, u8) {
    match color {
        Color::Rgb(r, g, b) => (r, g, b),
        _ => (0, 0, 0),
    }
}
