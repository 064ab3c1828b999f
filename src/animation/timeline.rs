//! Transition timelines as explicit step lists
//!
//! A [`TransitionSequence`] is an immutable list of [`ScheduledStep`]s, each
//! with an absolute start offset from the sequence origin. Offsets are
//! resolved once at construction from each [`Step`]'s [`Position`].

use std::collections::BTreeSet;
use std::time::Duration;

use super::easing::Easing;
use crate::rendering::document::{StyleProperty, TargetId};

/// Where a step starts on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Position {
    /// Right after the previous step ends
    #[default]
    Append,
    /// At an absolute offset from the timeline origin, in seconds
    At(f64),
    /// Relative to the previous step's end; negative values overlap.
    /// The resolved start never goes below the origin.
    Relative(f64),
}

/// One tween: animate `properties` to their end values on every target
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub targets: Vec<TargetId>,
    pub properties: Vec<(StyleProperty, f64)>,
    pub duration: Duration,
    pub easing: Easing,
    pub position: Position,
}

impl Step {
    pub fn to(targets: impl IntoIterator<Item = impl Into<TargetId>>) -> Self {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            properties: Vec::new(),
            duration: Duration::from_millis(300),
            easing: Easing::default(),
            position: Position::Append,
        }
    }

    pub fn set(mut self, property: StyleProperty, end_value: f64) -> Self {
        self.properties.retain(|(p, _)| *p != property);
        self.properties.push((property, end_value));
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn millis(self, millis: u64) -> Self {
        self.duration(Duration::from_millis(millis))
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

/// A step with its start resolved against the sequence origin
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledStep {
    pub step: Step,
    pub start: Duration,
}

impl ScheduledStep {
    pub fn end(&self) -> Duration {
        self.start.saturating_add(self.step.duration)
    }

    /// Linear progress in `[0, 1]` at `elapsed` since the sequence origin,
    /// or `None` before the step starts
    pub fn progress(&self, elapsed: Duration) -> Option<f64> {
        if elapsed < self.start {
            return None;
        }
        if self.step.duration.is_zero() {
            return Some(1.0);
        }
        let into = (elapsed - self.start).as_secs_f64();
        Some((into / self.step.duration.as_secs_f64()).min(1.0))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransitionSequence {
    steps: Vec<ScheduledStep>,
    total: Duration,
}

impl TransitionSequence {
    pub fn new(steps: Vec<Step>) -> Self {
        let mut scheduled = Vec::with_capacity(steps.len());
        let mut cursor = Duration::ZERO;
        let mut total = Duration::ZERO;

        for step in steps {
            let start = match step.position {
                Position::Append => cursor,
                Position::At(offset) => resolve_offset(offset, cursor),
                Position::Relative(delta) => resolve_offset(cursor.as_secs_f64() + delta, cursor),
            };
            let entry = ScheduledStep { step, start };
            cursor = entry.end();
            total = total.max(cursor);
            scheduled.push(entry);
        }

        Self {
            steps: scheduled,
            total,
        }
    }

    pub fn steps(&self) -> &[ScheduledStep] {
        &self.steps
    }

    /// End of the last step to finish
    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Every target touched by any step
    pub fn targets(&self) -> BTreeSet<TargetId> {
        self.steps
            .iter()
            .flat_map(|s| s.step.targets.iter().cloned())
            .collect()
    }
}

/// Seconds from the origin, or `fallback` when not representable
fn resolve_offset(seconds: f64, fallback: Duration) -> Duration {
    if !seconds.is_finite() {
        return fallback;
    }
    Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(fallback)
}
