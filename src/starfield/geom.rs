use std::ops::{Add, AddAssign, Mul};

use super::canvas::{CELL_HEIGHT_PX, CELL_WIDTH_PX};

/// A position or velocity in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector of length `speed` pointing `degrees` off the horizontal (screen y grows downwards).
    pub fn from_heading(degrees: f64, speed: f64) -> Self {
        let rad = degrees.to_radians();
        Self {
            x: rad.cos() * speed,
            y: rad.sin() * speed,
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Visible drawing area in logical pixels, anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Pixel bounds of a terminal area `cols` x `rows` cells large.
    pub fn from_cells(cols: u16, rows: u16) -> Self {
        Self::new(cols as f64 * CELL_WIDTH_PX, rows as f64 * CELL_HEIGHT_PX)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x < self.width && p.y < self.height
    }
}
