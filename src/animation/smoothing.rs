//! Critically damped smoothing filter
//!
//! A rendered value chases a continuously updated target over a fixed
//! short duration. Bursts of input move the target in jumps; the rendered
//! value follows them as one continuous motion without overshooting.

use std::time::Duration;

const SETTLE_EPSILON: f64 = 1e-4;

#[derive(Debug, Clone, PartialEq)]
pub struct SmoothingFilter {
    current: f64,
    target: f64,
    velocity: f64,
    smooth_time: f64,
}

impl SmoothingFilter {
    /// `smooth_time` is roughly how long the rendered value takes to catch up
    pub fn new(smooth_time: Duration) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            velocity: 0.0,
            smooth_time: smooth_time.as_secs_f64(),
        }
    }

    /// Jump both rendered value and target to `value`
    pub fn reset(&mut self, value: f64) {
        self.current = value;
        self.target = value;
        self.velocity = 0.0;
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn value(&self) -> f64 {
        self.current
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target && self.velocity == 0.0
    }

    /// Advance by `dt` and return the new rendered value
    pub fn step(&mut self, dt: Duration) -> f64 {
        let dt = dt.as_secs_f64();
        if self.is_settled() || dt <= 0.0 {
            return self.current;
        }
        if self.smooth_time <= 0.0 {
            self.reset(self.target);
            return self.current;
        }

        let omega = 2.0 / self.smooth_time;
        let x = omega * dt;
        let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

        let change = self.current - self.target;
        let temp = (self.velocity + omega * change) * dt;
        self.velocity = (self.velocity - omega * temp) * decay;
        let mut next = self.target + (change + temp) * decay;

        // Never pass the target
        let approaching_from_below = self.target > self.current;
        if approaching_from_below == (next > self.target) && next != self.target {
            next = self.target;
            self.velocity = 0.0;
        }
        self.current = next;

        if (self.target - self.current).abs() < SETTLE_EPSILON && self.velocity.abs() < SETTLE_EPSILON {
            self.reset(self.target);
        }
        self.current
    }
}
