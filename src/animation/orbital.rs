//! Gesture-driven orbital layout
//!
//! N items sit on a circle at evenly spaced base angles. Wheel and touch
//! deltas feed an unbounded rotation accumulator; the rendered rotation
//! chases the accumulator through a [`SmoothingFilter`] on the display
//! clock, so bursts of input read as one continuous spin.

use std::time::Duration;

use bevy::prelude::Resource;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::smoothing::SmoothingFilter;
use crate::core::errors::EngineError;
use crate::geometry::{distribute_angles, normalize_degrees, polar_to_cartesian};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }
}

/// Per-source input scaling: `rotation_delta = raw / sensitivity * sign`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureTuning {
    pub wheel_sensitivity: f64,
    pub wheel_direction: Direction,
    pub touch_sensitivity: f64,
    pub touch_direction: Direction,
}

impl Default for GestureTuning {
    fn default() -> Self {
        Self {
            wheel_sensitivity: 4.0,
            wheel_direction: Direction::Forward,
            touch_sensitivity: 2.0,
            touch_direction: Direction::Reverse,
        }
    }
}

/// Viewport classes with their own orbit radius
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportClass {
    Mobile,
    Desktop,
}

impl ViewportClass {
    pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

    pub fn from_width(width: f64) -> Self {
        if width < Self::MOBILE_BREAKPOINT_PX {
            ViewportClass::Mobile
        } else {
            ViewportClass::Desktop
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalItem {
    pub index: usize,
    pub base_angle_deg: f64,
    pub radius_px: f64,
}

impl OrbitalItem {
    /// Position relative to the orbit center, before the global rotation
    pub fn local_position(&self) -> Point {
        polar_to_cartesian(self.base_angle_deg, self.radius_px)
    }

    /// Counter-rotation keeping the item upright relative to its spoke
    pub fn rotation_deg(&self) -> f64 {
        self.base_angle_deg
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalLayout {
    pub items: Vec<OrbitalItem>,
    /// Unbounded accumulator; render through [`normalize_degrees`]
    pub rotation_deg: f64,
}

impl OrbitalLayout {
    pub fn new(item_count: usize, radius_px: f64, rotation_deg: f64) -> Self {
        Self {
            items: place_items(item_count, radius_px),
            rotation_deg,
        }
    }

    pub fn radius(&self) -> Option<f64> {
        self.items.first().map(|item| item.radius_px)
    }
}

fn place_items(item_count: usize, radius_px: f64) -> Vec<OrbitalItem> {
    distribute_angles(item_count)
        .into_iter()
        .enumerate()
        .map(|(index, base_angle_deg)| OrbitalItem {
            index,
            base_angle_deg,
            radius_px,
        })
        .collect()
}

type RotationCallback = Box<dyn FnMut(f64) + Send + Sync>;

#[derive(Resource)]
pub struct OrbitalGestureController {
    tuning: GestureTuning,
    layout: Option<OrbitalLayout>,
    filter: SmoothingFilter,
    listeners_attached: bool,
    callbacks: Vec<RotationCallback>,
    last_reported: Option<f64>,
}

impl OrbitalGestureController {
    pub fn new(tuning: GestureTuning, smoothing: Duration) -> Self {
        Self {
            tuning,
            layout: None,
            filter: SmoothingFilter::new(smoothing),
            listeners_attached: false,
            callbacks: Vec::new(),
            last_reported: None,
        }
    }

    /// Lay out `item_count` items and start accepting input.
    ///
    /// Re-initializing tears the previous activation down first so deltas
    /// are never applied twice. Zero items is logged and ignored.
    pub fn initialize(&mut self, item_count: usize, radius_px: f64, starting_rotation_deg: f64) {
        if item_count == 0 {
            warn!("{}", EngineError::invalid("orbital item count", "0"));
            return;
        }
        if self.is_active() {
            self.teardown();
        }

        self.layout = Some(OrbitalLayout::new(item_count, radius_px, starting_rotation_deg));
        self.filter.reset(starting_rotation_deg);
        self.last_reported = None;
        self.listeners_attached = true;
        debug!(
            "Orbital layout initialized: {} items, radius {}, rotation {}",
            item_count, radius_px, starting_rotation_deg
        );
    }

    pub fn is_active(&self) -> bool {
        self.listeners_attached
    }

    pub fn layout(&self) -> Option<&OrbitalLayout> {
        self.layout.as_ref()
    }

    /// Report rendered rotations to `callback` until the next teardown.
    /// Ignored while the controller is inactive.
    pub fn on_rotation_change(&mut self, callback: impl FnMut(f64) + Send + Sync + 'static) -> bool {
        if !self.listeners_attached {
            debug!("Rotation callback ignored: orbital controller is inactive");
            return false;
        }
        self.callbacks.push(Box::new(callback));
        true
    }

    pub fn apply_wheel_delta(&mut self, delta_y: f64) {
        let delta = delta_y / self.tuning.wheel_sensitivity * self.tuning.wheel_direction.sign();
        self.accumulate(delta);
    }

    pub fn apply_touch_delta(&mut self, delta_x: f64) {
        let delta = delta_x / self.tuning.touch_sensitivity * self.tuning.touch_direction.sign();
        self.accumulate(delta);
    }

    fn accumulate(&mut self, delta: f64) {
        if !self.listeners_attached || !delta.is_finite() {
            return;
        }
        let Some(layout) = self.layout.as_mut() else {
            return;
        };
        layout.rotation_deg += delta;
        self.filter.set_target(layout.rotation_deg);
    }

    /// One display frame: step the smoothing filter and report the rendered
    /// rotation to every callback when it changed.
    pub fn advance(&mut self, dt: Duration) -> Option<f64> {
        if !self.listeners_attached {
            return None;
        }
        self.filter.step(dt);
        let rendered = self.rendered_rotation_deg()?;
        if self.last_reported != Some(rendered) {
            self.last_reported = Some(rendered);
            for callback in self.callbacks.iter_mut() {
                callback(rendered);
            }
        }
        Some(rendered)
    }

    /// The smoothed rotation wrapped into `[0, 360)`
    pub fn rendered_rotation_deg(&self) -> Option<f64> {
        self.layout
            .as_ref()
            .map(|_| normalize_degrees(self.filter.value()))
    }

    /// Re-place every item at a new radius (viewport class changed)
    pub fn set_radius(&mut self, radius_px: f64) {
        let Some(layout) = self.layout.as_mut() else {
            return;
        };
        if layout.radius() == Some(radius_px) {
            return;
        }
        layout.items = place_items(layout.items.len(), radius_px);
        debug!("Orbital radius set to {}", radius_px);
    }

    /// Item angle including the rendered global rotation
    pub fn effective_angle_deg(&self, index: usize) -> Option<f64> {
        let item = self.layout.as_ref()?.items.get(index)?;
        Some(normalize_degrees(item.base_angle_deg + self.rendered_rotation_deg()?))
    }

    /// Item position relative to the orbit center including the rotation
    pub fn world_position(&self, index: usize) -> Option<Point> {
        let item = self.layout.as_ref()?.items.get(index)?;
        Some(polar_to_cartesian(
            self.effective_angle_deg(index)?,
            item.radius_px,
        ))
    }

    /// Detach input, stop smoothing and drop callbacks. Safe to call twice.
    pub fn teardown(&mut self) {
        self.callbacks.clear();
        if !self.listeners_attached && self.layout.is_none() {
            return;
        }
        self.listeners_attached = false;
        self.layout = None;
        self.last_reported = None;
        debug!("Orbital controller torn down");
    }
}
