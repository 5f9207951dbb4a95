use std::collections::VecDeque;

use super::geom::Point;

pub const MIN_BRIGHTNESS: i32 = 100;
pub const MAX_BRIGHTNESS: i32 = 255;
pub const TWINKLE_STEP: i32 = 10;

pub const TRAIL_LEN: usize = 20;
pub const MIN_LIFETIME_SECS: f64 = 1.8;
pub const MAX_LIFETIME_SECS: f64 = 4.5;

// Fading covers the last 30% of a shooting star's life.
const FADE_START: f64 = 0.7;
const FADE_SPAN: f64 = 0.3;
const TRAIL_OPACITY: f64 = 0.6;

/// A fixed background star whose brightness bounces between 100 and 255.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientStar {
    pub position: Point,
    pub brightness: i32,
    pub delta: i32,
}

impl AmbientStar {
    pub fn new(position: Point, brightness: i32, delta: i32) -> Self {
        Self {
            position,
            brightness,
            delta,
        }
    }

    /// One twinkle step. The direction flips once brightness has left the
    /// band, so the value can sit one step outside it before coming back.
    pub fn twinkle(&mut self) {
        self.brightness += self.delta;
        if self.brightness > MAX_BRIGHTNESS || self.brightness < MIN_BRIGHTNESS {
            self.delta = -self.delta;
        }
    }

    /// Brightness as a paintable opacity.
    pub fn alpha(&self) -> u8 {
        self.brightness.clamp(0, 255) as u8
    }
}

/// Seconds a shooting star lives. Always within [1.8, 4.5], never zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Lifetime(f64);

impl Lifetime {
    pub fn new(secs: f64) -> Self {
        if secs.is_finite() {
            Self(secs.clamp(MIN_LIFETIME_SECS, MAX_LIFETIME_SECS))
        } else {
            Self(MIN_LIFETIME_SECS)
        }
    }

    pub fn secs(self) -> f64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShootingStar {
    pub position: Point,
    /// Pixels per second.
    pub velocity: Point,
    pub brightness: u8,
    pub age: f64,
    pub lifetime: Lifetime,
    /// Recent head positions, oldest first.
    pub trail: VecDeque<Point>,
}

impl ShootingStar {
    pub fn launch(position: Point, velocity: Point, lifetime: Lifetime) -> Self {
        Self {
            position,
            velocity,
            brightness: 255,
            age: 0.0,
            lifetime,
            trail: VecDeque::with_capacity(TRAIL_LEN + 1),
        }
    }

    pub fn advance(&mut self, dt: f64) {
        self.age += dt;
        self.position += self.velocity * dt;

        self.trail.push_back(self.position);
        if self.trail.len() > TRAIL_LEN {
            self.trail.pop_front();
        }

        self.refresh_brightness();
    }

    /// Recompute brightness from age once the fade window has started.
    pub fn refresh_brightness(&mut self) {
        let lifetime = self.lifetime.secs();
        if self.age <= lifetime * FADE_START {
            return;
        }
        // 255 * (1 - (age - 0.7L) / 0.3L), rearranged so 0.85L lands on exactly half.
        let remaining = (lifetime - self.age) / (lifetime * FADE_SPAN);
        let scaled = (255.0 * remaining).clamp(0.0, 255.0);
        // Snap away float noise first so exact halves still round up.
        self.brightness = ((scaled * 1e6).round() / 1e6).round() as u8;
    }

    pub fn is_expired(&self) -> bool {
        self.age > self.lifetime.secs()
    }

    /// Opacity of the trail point at `index` (0 = oldest).
    pub fn trail_alpha(&self, index: usize) -> u8 {
        let len = self.trail.len().max(1) as f64;
        let alpha = self.brightness as f64 * (index + 1) as f64 / len * TRAIL_OPACITY;
        alpha.round().clamp(0.0, 255.0) as u8
    }
}
