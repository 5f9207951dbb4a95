//! Animated night sky: twinkling ambient stars plus the occasional shooting
//! star with a fading tail.
//!
//! The field is advanced by [`StarField::tick`] on a fixed timer and painted
//! by [`StarField::render`], which only reads state. A tick never draws; it
//! raises a redraw request that the event loop collects with
//! [`StarField::take_redraw_request`], so bursts of ticks collapse into a
//! single frame.

pub mod canvas;
pub mod geom;
pub mod sky;
pub mod star;

use std::time::Instant;

use rand::rngs::StdRng;
use tracing::debug;

pub use canvas::{BufferCanvas, Canvas, Rgba};
pub use geom::{Bounds, Point};
pub use sky::{RandomSky, SkySource};
pub use star::{AmbientStar, ShootingStar};

pub const AMBIENT_STAR_COUNT: usize = 250;

pub const SKY_COLOR: Rgba = Rgba::rgb(10, 5, 25);
pub const AMBIENT_COLOR: Rgba = Rgba::rgb(255, 255, 200);
pub const TRAIL_COLOR: Rgba = Rgba::rgb(200, 220, 255);
pub const HEAD_COLOR: Rgba = Rgba::rgb(255, 255, 255);

const POINT_WIDTH: u8 = 1;
const HEAD_WIDTH: u8 = 3;

pub struct StarField<S = RandomSky<StdRng>> {
    ambient: Vec<AmbientStar>,
    shooting: Vec<ShootingStar>,
    bounds: Bounds,
    last_update: Instant,
    spawn_accumulator: f64,
    spawn_threshold: f64,
    redraw_requested: bool,
    source: S,
}

impl StarField {
    /// A sky seeded from OS entropy, clocked from now.
    pub fn with_entropy(bounds: Bounds) -> Self {
        Self::new(bounds, RandomSky::from_entropy(), Instant::now())
    }
}

impl<S: SkySource> StarField<S> {
    pub fn new(bounds: Bounds, mut source: S, now: Instant) -> Self {
        let ambient = (0..AMBIENT_STAR_COUNT)
            .map(|_| source.ambient_star())
            .collect();
        let spawn_threshold = source.spawn_threshold();

        Self {
            ambient,
            shooting: Vec::new(),
            bounds,
            last_update: now,
            spawn_accumulator: 0.0,
            spawn_threshold,
            redraw_requested: true,
            source,
        }
    }

    /// Timer callback: advance by the wall-clock time since the previous tick.
    pub fn tick(&mut self, now: Instant) {
        let dt = now.saturating_duration_since(self.last_update).as_secs_f64();
        self.last_update = now;
        self.step(dt);
    }

    /// Advance the sky by `dt` seconds.
    pub fn step(&mut self, dt: f64) {
        for star in &mut self.ambient {
            star.twinkle();
        }

        let bounds = self.bounds;
        self.shooting.retain_mut(|star| {
            star.advance(dt);
            let alive = !star.is_expired() && bounds.contains(star.position);
            if !alive {
                debug!(age = star.age, x = star.position.x, y = star.position.y, "shooting star gone");
            }
            alive
        });

        self.spawn_accumulator += dt;
        if self.spawn_accumulator > self.spawn_threshold {
            let star = self.source.shooting_star();
            debug!(
                x = star.position.x,
                y = star.position.y,
                lifetime = star.lifetime.secs(),
                "shooting star spawned"
            );
            self.shooting.push(star);
            self.spawn_accumulator = 0.0;
            self.spawn_threshold = self.source.spawn_threshold();
        }

        self.redraw_requested = true;
    }

    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let size = canvas.size();
        canvas.fill_rect(Point::ORIGIN, size, SKY_COLOR);

        for star in &self.ambient {
            canvas.plot(star.position, AMBIENT_COLOR.with_alpha(star.alpha()), POINT_WIDTH);
        }

        for star in &self.shooting {
            if star.trail.is_empty() {
                continue;
            }
            for (i, point) in star.trail.iter().enumerate() {
                let alpha = star.trail_alpha(i);
                if alpha == 0 {
                    continue;
                }
                canvas.plot(*point, TRAIL_COLOR.with_alpha(alpha), POINT_WIDTH);
            }
            canvas.plot(star.position, HEAD_COLOR.with_alpha(star.brightness), HEAD_WIDTH);
        }
    }

    /// New culling bounds. Stars already in the sky stay where they are.
    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        self.redraw_requested = true;
    }

    /// Returns whether a redraw was requested since the last call, clearing it.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    pub fn ambient_stars(&self) -> &[AmbientStar] {
        &self.ambient
    }

    pub fn shooting_stars(&self) -> &[ShootingStar] {
        &self.shooting
    }

    pub fn spawn_accumulator(&self) -> f64 {
        self.spawn_accumulator
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::time::Duration;

    use rand::SeedableRng;

    use super::star::{Lifetime, MAX_BRIGHTNESS, MIN_BRIGHTNESS, TRAIL_LEN, TWINKLE_STEP};
    use super::*;

    /// Hands out pre-built stars and thresholds in order.
    struct ScriptedSky {
        ambient: AmbientStar,
        shooting: VecDeque<ShootingStar>,
        thresholds: VecDeque<f64>,
        fallback_threshold: f64,
    }

    impl ScriptedSky {
        fn new(shooting: Vec<ShootingStar>, thresholds: Vec<f64>, fallback_threshold: f64) -> Self {
            Self {
                ambient: AmbientStar::new(Point::new(10.0, 10.0), 150, TWINKLE_STEP),
                shooting: shooting.into(),
                thresholds: thresholds.into(),
                fallback_threshold,
            }
        }
    }

    impl SkySource for ScriptedSky {
        fn ambient_star(&mut self) -> AmbientStar {
            self.ambient
        }

        fn shooting_star(&mut self) -> ShootingStar {
            self.shooting.pop_front().unwrap_or_else(|| {
                ShootingStar::launch(Point::new(1.0, 1.0), Point::ORIGIN, Lifetime::new(2.0))
            })
        }

        fn spawn_threshold(&mut self) -> f64 {
            self.thresholds.pop_front().unwrap_or(self.fallback_threshold)
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Fill(Point, Bounds, Rgba),
        Plot(Point, Rgba, u8),
    }

    struct RecordingCanvas {
        size: Bounds,
        ops: Vec<Op>,
    }

    impl RecordingCanvas {
        fn new(size: Bounds) -> Self {
            Self { size, ops: Vec::new() }
        }
    }

    impl Canvas for RecordingCanvas {
        fn size(&self) -> Bounds {
            self.size
        }

        fn fill_rect(&mut self, origin: Point, size: Bounds, color: Rgba) {
            self.ops.push(Op::Fill(origin, size, color));
        }

        fn plot(&mut self, at: Point, color: Rgba, width: u8) {
            self.ops.push(Op::Plot(at, color, width));
        }
    }

    fn seeded_field(bounds: Bounds) -> StarField<RandomSky<StdRng>> {
        StarField::new(bounds, RandomSky::new(StdRng::seed_from_u64(7)), Instant::now())
    }

    fn single_star_field(star: ShootingStar, bounds: Bounds) -> StarField<ScriptedSky> {
        // Threshold 0 spawns on the first step; nothing else ever spawns.
        let sky = ScriptedSky::new(vec![star], vec![0.0], f64::INFINITY);
        let mut field = StarField::new(bounds, sky, Instant::now());
        field.step(0.01);
        assert_eq!(field.shooting_stars().len(), 1);
        field
    }

    #[test]
    fn initialize_populates_ambient_sky_only() {
        let field = seeded_field(Bounds::new(800.0, 600.0));
        assert_eq!(field.ambient_stars().len(), AMBIENT_STAR_COUNT);
        assert!(field.shooting_stars().is_empty());
        assert_eq!(field.spawn_accumulator(), 0.0);
        for s in field.ambient_stars() {
            assert!(s.position.x >= 0.0 && s.position.x <= 1920.0);
            assert!(s.position.y >= 0.0 && s.position.y <= 1920.0);
            assert!((MIN_BRIGHTNESS..=MAX_BRIGHTNESS).contains(&s.brightness));
            assert_eq!(s.delta.abs(), TWINKLE_STEP);
        }
    }

    #[test]
    fn ambient_brightness_overshoots_by_at_most_one_step() {
        let mut field = seeded_field(Bounds::new(800.0, 600.0));
        for _ in 0..200 {
            let before: Vec<AmbientStar> = field.ambient_stars().to_vec();
            field.step(0.08);
            for (old, new) in before.iter().zip(field.ambient_stars()) {
                assert_eq!(new.brightness, old.brightness + old.delta);
                assert!(new.brightness >= MIN_BRIGHTNESS - TWINKLE_STEP);
                assert!(new.brightness <= MAX_BRIGHTNESS + TWINKLE_STEP);
                let left_band = new.brightness > MAX_BRIGHTNESS || new.brightness < MIN_BRIGHTNESS;
                assert_eq!(new.delta == -old.delta, left_band);
                assert_eq!(new.position, old.position);
            }
        }
    }

    #[test]
    fn tick_uses_wall_clock_delta() {
        let start = Instant::now();
        let star = ShootingStar::launch(Point::new(100.0, 100.0), Point::new(100.0, 0.0), Lifetime::new(4.0));
        let sky = ScriptedSky::new(vec![star], vec![0.0], f64::INFINITY);
        let mut field = StarField::new(Bounds::new(800.0, 600.0), sky, start);

        field.tick(start + Duration::from_millis(80));
        assert!((field.spawn_accumulator() - 0.0).abs() < 1e-12);
        assert_eq!(field.shooting_stars().len(), 1);

        field.tick(start + Duration::from_millis(580));
        let s = &field.shooting_stars()[0];
        assert!((s.age - 0.5).abs() < 1e-9);
        assert!((s.position.x - 150.0).abs() < 1e-6);
        assert!((field.spawn_accumulator() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn trails_stay_bounded_across_many_ticks() {
        let star = ShootingStar::launch(Point::new(10.0, 10.0), Point::new(20.0, 10.0), Lifetime::new(4.5));
        let mut field = single_star_field(star, Bounds::new(800.0, 600.0));
        for _ in 0..50 {
            field.step(0.08);
            for s in field.shooting_stars() {
                assert!(s.trail.len() <= TRAIL_LEN);
                let xs: Vec<f64> = s.trail.iter().map(|p| p.x).collect();
                assert!(xs.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn star_leaving_bounds_is_removed_on_that_tick() {
        let star = ShootingStar::launch(Point::new(795.0, 300.0), Point::new(100.0, 0.0), Lifetime::new(4.0));
        let mut field = single_star_field(star, Bounds::new(800.0, 600.0));

        // Not moved on the spawning step; 795 + 2 = 797 is still visible.
        field.step(0.02);
        assert_eq!(field.shooting_stars().len(), 1);

        // 797 + 4 = 801: gone this tick.
        field.step(0.04);
        assert!(field.shooting_stars().is_empty());
    }

    #[test]
    fn resize_changes_culling_without_moving_stars() {
        let star = ShootingStar::launch(Point::new(500.0, 300.0), Point::ORIGIN, Lifetime::new(4.0));
        let mut field = single_star_field(star, Bounds::new(800.0, 600.0));
        let before: Vec<Point> = field.ambient_stars().iter().map(|s| s.position).collect();

        field.resize(Bounds::new(400.0, 600.0));
        let after: Vec<Point> = field.ambient_stars().iter().map(|s| s.position).collect();
        assert_eq!(before, after);
        assert_eq!(field.shooting_stars().len(), 1);

        field.step(0.08);
        assert!(field.shooting_stars().is_empty());
    }

    #[test]
    fn lifetime_two_seconds_is_gone_after_two_point_zero_one() {
        let star = ShootingStar::launch(Point::new(400.0, 300.0), Point::ORIGIN, Lifetime::new(2.0));
        let mut field = single_star_field(star, Bounds::new(800.0, 600.0));

        field.step(2.0);
        assert_eq!(field.shooting_stars().len(), 1);
        assert_eq!(field.shooting_stars()[0].age, 2.0);

        field.step(0.01);
        assert!(field.shooting_stars().is_empty());
    }

    #[test]
    fn forced_five_second_threshold_spawns_exactly_once_in_ten_seconds() {
        let star = ShootingStar::launch(Point::new(400.0, 300.0), Point::new(20.0, 10.0), Lifetime::new(1.8));
        let sky = ScriptedSky::new(vec![star], Vec::new(), 5.0);
        let mut field = StarField::new(Bounds::new(800.0, 600.0), sky, Instant::now());

        let mut counts = Vec::new();
        for _ in 0..125 {
            field.step(0.08);
            counts.push(field.shooting_stars().len());
        }

        // Accumulator passes 5.0 on step 63 (t = 5.04s).
        assert!(counts[..62].iter().all(|&n| n == 0));
        assert_eq!(counts[62], 1);
        // Lifetime 1.8s: age 1.84 after 23 more steps removes it.
        assert!(counts[62..85].iter().all(|&n| n == 1));
        assert!(counts[85..].iter().all(|&n| n == 0));
        assert_eq!(counts.iter().filter(|&&n| n > 1).count(), 0);
    }

    #[test]
    fn survivors_keep_creation_order() {
        let a = ShootingStar::launch(Point::new(100.0, 100.0), Point::ORIGIN, Lifetime::new(1.8));
        let b = ShootingStar::launch(Point::new(200.0, 100.0), Point::ORIGIN, Lifetime::new(4.5));
        let c = ShootingStar::launch(Point::new(300.0, 100.0), Point::ORIGIN, Lifetime::new(4.5));
        let sky = ScriptedSky::new(vec![a, b, c], vec![0.0, 0.0, 0.0], f64::INFINITY);
        let mut field = StarField::new(Bounds::new(800.0, 600.0), sky, Instant::now());
        for _ in 0..3 {
            field.step(0.01);
        }
        assert_eq!(field.shooting_stars().len(), 3);

        field.step(1.9);
        let xs: Vec<f64> = field.shooting_stars().iter().map(|s| s.position.x).collect();
        assert_eq!(xs, vec![200.0, 300.0]);
    }

    #[test]
    fn redraw_requests_coalesce() {
        let mut field = seeded_field(Bounds::new(800.0, 600.0));
        assert!(field.take_redraw_request());
        assert!(!field.take_redraw_request());

        field.step(0.08);
        field.step(0.08);
        assert!(field.take_redraw_request());
        assert!(!field.take_redraw_request());
    }

    #[test]
    fn render_paints_background_then_stars() {
        let star = ShootingStar::launch(Point::new(400.0, 300.0), Point::new(50.0, 0.0), Lifetime::new(4.0));
        let mut field = single_star_field(star, Bounds::new(800.0, 600.0));
        field.step(0.08);
        field.step(0.08);

        let mut canvas = RecordingCanvas::new(Bounds::new(800.0, 600.0));
        field.render(&mut canvas);

        assert_eq!(
            canvas.ops[0],
            Op::Fill(Point::ORIGIN, Bounds::new(800.0, 600.0), SKY_COLOR)
        );
        let ambient = canvas.ops[1..=AMBIENT_STAR_COUNT]
            .iter()
            .filter(|op| matches!(op, Op::Plot(_, c, 1) if (c.r, c.g, c.b) == (255, 255, 200)))
            .count();
        assert_eq!(ambient, AMBIENT_STAR_COUNT);

        // Two trail points then the head.
        let tail = &canvas.ops[AMBIENT_STAR_COUNT + 1..];
        assert_eq!(tail.len(), 3);
        assert!(matches!(tail[0], Op::Plot(_, c, 1) if c == TRAIL_COLOR.with_alpha(77)));
        assert!(matches!(tail[1], Op::Plot(_, c, 1) if c == TRAIL_COLOR.with_alpha(153)));
        assert!(matches!(tail[2], Op::Plot(_, c, 3) if c == HEAD_COLOR.with_alpha(255)));
    }

    #[test]
    fn faded_trail_points_are_skipped() {
        let star = ShootingStar::launch(Point::new(400.0, 300.0), Point::ORIGIN, Lifetime::new(2.0));
        let mut field = single_star_field(star, Bounds::new(800.0, 600.0));
        field.step(2.0);
        assert_eq!(field.shooting_stars()[0].brightness, 0);

        let mut canvas = RecordingCanvas::new(Bounds::new(800.0, 600.0));
        field.render(&mut canvas);
        let tail = &canvas.ops[AMBIENT_STAR_COUNT + 1..];
        // Only the head remains, fully transparent.
        assert_eq!(tail, &[Op::Plot(Point::new(400.0, 300.0), HEAD_COLOR.with_alpha(0), 3)]);
    }

    #[test]
    fn render_is_a_pure_read() {
        let mut field = seeded_field(Bounds::new(800.0, 600.0));
        for _ in 0..100 {
            field.step(0.08);
        }

        let mut first = RecordingCanvas::new(Bounds::new(800.0, 600.0));
        let mut second = RecordingCanvas::new(Bounds::new(800.0, 600.0));
        field.render(&mut first);
        field.render(&mut second);
        assert_eq!(first.ops, second.ops);
    }

    #[test]
    fn render_into_terminal_buffer_is_repeatable() {
        use ratatui::buffer::Buffer;
        use ratatui::layout::Rect;

        let field = seeded_field(Bounds::from_cells(240, 120));
        let area = Rect::new(0, 0, 240, 120);
        let mut a = Buffer::empty(area);
        let mut b = Buffer::empty(area);
        field.render(&mut BufferCanvas::new(&mut a, area));
        field.render(&mut BufferCanvas::new(&mut b, area));
        assert_eq!(a, b);
        assert!(a.content.iter().any(|c| c.symbol() != " "));
    }
}
