//! Bounding-box bounce simulation ("ricochet" mode)
//!
//! The simulator is driven by a fixed-interval clock rather than the
//! display's paint rate, so motion keeps integrating while the window is
//! unfocused or throttled. Each tick measures the wall-clock time since the
//! previous one and integrates over the whole gap.

use std::time::Duration;

use bevy::prelude::Resource;
use kurbo::{Point, Size, Vec2};
use rand::Rng;
use tracing::debug;

/// Nominal ticks per second of the fixed-interval clock
pub const DEFAULT_TICK_RATE_HZ: f64 = 60.0;

/// Which axes reflected during one integration step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reflection {
    pub x: bool,
    pub y: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BounceState {
    pub position: Point,
    pub velocity: Vec2,
    pub bounds: Size,
    pub element_size: Size,
}

impl BounceState {
    /// Largest valid position on each axis, never below zero
    pub fn max_position(&self) -> Point {
        Point::new(
            (self.bounds.width - self.element_size.width).max(0.0),
            (self.bounds.height - self.element_size.height).max(0.0),
        )
    }

    /// Advance by `elapsed`, reflecting off the container walls.
    ///
    /// `speed_per_frame = speed * elapsed_ms / 1000` scales the per-tick
    /// velocity; every axis is handled independently and the position is
    /// clamped into `[0, bounds - element_size]` afterwards.
    pub fn integrate(&mut self, speed: f64, elapsed: Duration) -> Reflection {
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        let speed_per_frame = speed * elapsed_ms / 1000.0;
        let proposed = self.position + self.velocity * speed_per_frame;
        let max = self.max_position();

        let (x, reflect_x) = resolve_axis(proposed.x, max.x, &mut self.velocity.x);
        let (y, reflect_y) = resolve_axis(proposed.y, max.y, &mut self.velocity.y);
        self.position = Point::new(x, y);

        Reflection {
            x: reflect_x,
            y: reflect_y,
        }
    }
}

/// Reflect the velocity away from whichever wall was reached, keeping its
/// magnitude, and clamp the coordinate into `[0, max]`.
fn resolve_axis(proposed: f64, max: f64, velocity: &mut f64) -> (f64, bool) {
    let mut reflected = false;
    if proposed <= 0.0 && *velocity < 0.0 {
        *velocity = -*velocity;
        reflected = true;
    } else if proposed >= max && *velocity > 0.0 {
        *velocity = -*velocity;
        reflected = true;
    }
    (proposed.clamp(0.0, max), reflected)
}

type PlacementCallback = Box<dyn FnMut(Point) + Send + Sync>;

#[derive(Resource)]
pub struct BounceSimulator {
    tick_rate_hz: f64,
    speed: f64,
    state: Option<BounceState>,
    last_tick: Option<Duration>,
    run_generation: u64,
    on_tick: Option<PlacementCallback>,
}

impl Default for BounceSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_RATE_HZ)
    }
}

impl BounceSimulator {
    pub fn new(tick_rate_hz: f64) -> Self {
        Self {
            tick_rate_hz: tick_rate_hz.max(1.0),
            speed: 0.0,
            state: None,
            last_tick: None,
            run_generation: 0,
            on_tick: None,
        }
    }

    /// Interval between ticks of the fixed clock driving this simulator
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz)
    }

    /// Register the placement callback invoked after every integration step
    pub fn on_tick(&mut self, callback: impl FnMut(Point) + Send + Sync + 'static) {
        self.on_tick = Some(Box::new(callback));
    }

    pub fn start(&mut self, bounds: Size, element_size: Size, speed_px_per_sec: f64) {
        self.start_with_rng(bounds, element_size, speed_px_per_sec, &mut rand::thread_rng());
    }

    /// Start a new run. Any previous run is stopped first so two runs never
    /// share a clock.
    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        bounds: Size,
        element_size: Size,
        speed_px_per_sec: f64,
        rng: &mut R,
    ) {
        if self.is_running() {
            self.stop();
        }

        let mut state = BounceState {
            position: Point::ZERO,
            velocity: Vec2::ZERO,
            bounds,
            element_size,
        };
        let max = state.max_position();
        state.position = Point::new(max.x / 2.0, max.y / 2.0);

        let magnitude = speed_px_per_sec / self.tick_rate_hz;
        let mut random_sign = || if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        state.velocity = Vec2::new(magnitude * random_sign(), magnitude * random_sign());

        let position = state.position;
        self.speed = speed_px_per_sec;
        self.state = Some(state);
        self.last_tick = None;
        self.run_generation += 1;
        debug!(
            "Bounce run {} started at ({:.1}, {:.1}) with speed {}",
            self.run_generation, position.x, position.y, speed_px_per_sec
        );
        self.emit(position);
    }

    /// Stop the current run and drop its pending tick. Safe to call twice.
    pub fn stop(&mut self) {
        if self.state.take().is_none() {
            return;
        }
        self.last_tick = None;
        debug!("Bounce run {} stopped", self.run_generation);
    }

    pub fn is_running(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&BounceState> {
        self.state.as_ref()
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Incremented by every `start`
    pub fn run_generation(&self) -> u64 {
        self.run_generation
    }

    /// One tick of the fixed-interval clock at monotonic time `now`.
    ///
    /// The first tick of a run only records the baseline. Ticks that arrive
    /// with no elapsed time (catch-up steps sharing a timestamp) are skipped.
    pub fn tick_at(&mut self, now: Duration) -> Option<Point> {
        let state = self.state.as_mut()?;

        let Some(previous) = self.last_tick else {
            self.last_tick = Some(now);
            return None;
        };
        let elapsed = now.checked_sub(previous).filter(|e| !e.is_zero())?;
        self.last_tick = Some(now);

        state.integrate(self.speed, elapsed);
        let position = state.position;
        self.emit(position);
        Some(position)
    }

    /// Container resized: new bounds, same position and velocity
    pub fn resize(&mut self, bounds: Size) {
        if let Some(state) = self.state.as_mut() {
            state.bounds = bounds;
        }
    }

    /// Change speed mid-run, keeping the direction of travel
    pub fn set_speed(&mut self, speed_px_per_sec: f64) {
        let magnitude = speed_px_per_sec / self.tick_rate_hz;
        self.speed = speed_px_per_sec;
        if let Some(state) = self.state.as_mut() {
            state.velocity = Vec2::new(
                magnitude.copysign(state.velocity.x),
                magnitude.copysign(state.velocity.y),
            );
        }
    }

    fn emit(&mut self, position: Point) {
        if let Some(callback) = self.on_tick.as_mut() {
            callback(position);
        }
    }
}
