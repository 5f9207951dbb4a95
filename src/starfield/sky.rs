use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::geom::Point;
use super::star::{
    AmbientStar, Lifetime, ShootingStar, MAX_BRIGHTNESS, MAX_LIFETIME_SECS, MIN_BRIGHTNESS,
    MIN_LIFETIME_SECS, TWINKLE_STEP,
};

/// Stars are scattered over this square regardless of the real window size.
pub const SKY_SPAN_PX: u32 = 1920;

pub const SHOOTING_HEADINGS_DEG: [f64; 2] = [-30.0, 150.0];
pub const MIN_SPEED_PX: f64 = 50.0;
pub const MAX_SPEED_PX: f64 = 300.0;
pub const MIN_SPAWN_SECS: f64 = 3.0;
pub const MAX_SPAWN_SECS: f64 = 8.0;

/// Where new stars come from. Swap it out to make the sky deterministic.
pub trait SkySource {
    fn ambient_star(&mut self) -> AmbientStar;
    fn shooting_star(&mut self) -> ShootingStar;
    /// Seconds to wait before the next shooting star.
    fn spawn_threshold(&mut self) -> f64;
}

/// Draws every star attribute uniformly from an `Rng`.
pub struct RandomSky<R> {
    rng: R,
}

impl RandomSky<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSky<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn random_position(&mut self) -> Point {
        Point::new(
            self.rng.gen_range(0..=SKY_SPAN_PX) as f64,
            self.rng.gen_range(0..=SKY_SPAN_PX) as f64,
        )
    }
}

impl<R: Rng> SkySource for RandomSky<R> {
    fn ambient_star(&mut self) -> AmbientStar {
        let position = self.random_position();
        let brightness = self.rng.gen_range(MIN_BRIGHTNESS..=MAX_BRIGHTNESS);
        let delta = if self.rng.gen_bool(0.5) {
            TWINKLE_STEP
        } else {
            -TWINKLE_STEP
        };
        AmbientStar::new(position, brightness, delta)
    }

    fn shooting_star(&mut self) -> ShootingStar {
        let position = self.random_position();
        let heading = SHOOTING_HEADINGS_DEG[self.rng.gen_range(0..SHOOTING_HEADINGS_DEG.len())];
        let speed = self.rng.gen_range(MIN_SPEED_PX..MAX_SPEED_PX);
        let lifetime = Lifetime::new(self.rng.gen_range(MIN_LIFETIME_SECS..MAX_LIFETIME_SECS));
        ShootingStar::launch(position, Point::from_heading(heading, speed), lifetime)
    }

    fn spawn_threshold(&mut self) -> f64 {
        self.rng.gen_range(MIN_SPAWN_SECS..MAX_SPAWN_SECS)
    }
}
