//! The presentation surface
//!
//! Everything the engine draws goes through [`PresentationSurface`]: the
//! bounce and orbital controllers write placements, the transition
//! orchestrator reads and writes style properties. [`SceneDocument`] is the
//! in-memory surface the Bevy scene mirrors every frame.

use std::collections::HashMap;
use std::fmt;

use bevy::prelude::*;
use kurbo::Vec2 as DocVec2;
use thiserror::Error;

use crate::core::errors::EngineError;

/// Identifies one element on the surface
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(String);

impl TargetId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TargetId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Animatable style properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleProperty {
    Opacity,
    /// Blur radius in pixels
    Blur,
    TranslateX,
    TranslateY,
    Scale,
}

impl StyleProperty {
    /// Value of the property on a freshly mounted element
    pub fn resting_value(self) -> f64 {
        match self {
            StyleProperty::Opacity | StyleProperty::Scale => 1.0,
            StyleProperty::Blur | StyleProperty::TranslateX | StyleProperty::TranslateY => 0.0,
        }
    }
}

/// A set of property values written together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleFrame {
    pub values: Vec<(StyleProperty, f64)>,
}

impl StyleFrame {
    pub fn new(values: Vec<(StyleProperty, f64)>) -> Self {
        Self { values }
    }

    pub fn get(&self, property: StyleProperty) -> Option<f64> {
        self.values
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, value)| *value)
    }
}

/// Layout placement: translation in pixels plus a clockwise rotation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    pub translate: DocVec2,
    pub rotation_deg: f64,
}

impl Placement {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            translate: DocVec2::new(x, y),
            rotation_deg: 0.0,
        }
    }

    pub fn rotated(rotation_deg: f64) -> Self {
        Self {
            translate: DocVec2::ZERO,
            rotation_deg,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.translate.is_finite() && self.rotation_deg.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    #[error("target '{0}' is not mounted")]
    MissingTarget(TargetId),
    #[error("cannot measure '{0}'")]
    Unmeasurable(TargetId),
    #[error("'{target}' rejected {property:?} = {value}")]
    Rejected {
        target: TargetId,
        property: StyleProperty,
        value: f64,
    },
    #[error("'{0}' rejected a non-finite placement")]
    InvalidPlacement(TargetId),
}

impl From<SurfaceError> for EngineError {
    fn from(error: SurfaceError) -> Self {
        let reason = error.to_string();
        match error {
            SurfaceError::MissingTarget(target) => EngineError::MissingReference(target.to_string()),
            SurfaceError::Unmeasurable(target)
            | SurfaceError::InvalidPlacement(target)
            | SurfaceError::Rejected { target, .. } => {
                EngineError::AnimationFailure {
                    target: target.to_string(),
                    reason,
                }
            }
        }
    }
}

pub trait PresentationSurface {
    fn read_style(&self, target: &TargetId, property: StyleProperty) -> Result<f64, SurfaceError>;

    fn apply_style(&mut self, target: &TargetId, frame: &StyleFrame) -> Result<(), SurfaceError>;

    fn place(&mut self, target: &TargetId, placement: Placement) -> Result<(), SurfaceError>;
}

/// Computed style of one mounted element
#[derive(Debug, Clone, PartialEq)]
pub struct ElementStyle {
    pub opacity: f64,
    pub blur: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    pub placement: Placement,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            opacity: StyleProperty::Opacity.resting_value(),
            blur: StyleProperty::Blur.resting_value(),
            translate_x: StyleProperty::TranslateX.resting_value(),
            translate_y: StyleProperty::TranslateY.resting_value(),
            scale: StyleProperty::Scale.resting_value(),
            placement: Placement::default(),
        }
    }
}

impl ElementStyle {
    pub fn hidden() -> Self {
        Self {
            opacity: 0.0,
            ..default()
        }
    }

    pub fn get(&self, property: StyleProperty) -> f64 {
        match property {
            StyleProperty::Opacity => self.opacity,
            StyleProperty::Blur => self.blur,
            StyleProperty::TranslateX => self.translate_x,
            StyleProperty::TranslateY => self.translate_y,
            StyleProperty::Scale => self.scale,
        }
    }

    fn set(&mut self, property: StyleProperty, value: f64) {
        let slot = match property {
            StyleProperty::Opacity => &mut self.opacity,
            StyleProperty::Blur => &mut self.blur,
            StyleProperty::TranslateX => &mut self.translate_x,
            StyleProperty::TranslateY => &mut self.translate_y,
            StyleProperty::Scale => &mut self.scale,
        };
        *slot = value;
    }
}

/// In-memory surface holding the computed style of every mounted element
#[derive(Resource, Debug, Default)]
pub struct SceneDocument {
    elements: HashMap<TargetId, ElementStyle>,
    revision: u64,
}

impl SceneDocument {
    pub fn mount(&mut self, target: impl Into<TargetId>, style: ElementStyle) {
        self.elements.insert(target.into(), style);
        self.revision += 1;
    }

    pub fn unmount(&mut self, target: &TargetId) -> bool {
        let removed = self.elements.remove(target).is_some();
        if removed {
            self.revision += 1;
        }
        removed
    }

    pub fn is_mounted(&self, target: &TargetId) -> bool {
        self.elements.contains_key(target)
    }

    pub fn style(&self, target: &TargetId) -> Option<&ElementStyle> {
        self.elements.get(target)
    }

    /// Bumped on every successful write
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl PresentationSurface for SceneDocument {
    fn read_style(&self, target: &TargetId, property: StyleProperty) -> Result<f64, SurfaceError> {
        let element = self
            .elements
            .get(target)
            .ok_or_else(|| SurfaceError::MissingTarget(target.clone()))?;
        let value = element.get(property);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(SurfaceError::Unmeasurable(target.clone()))
        }
    }

    fn apply_style(&mut self, target: &TargetId, frame: &StyleFrame) -> Result<(), SurfaceError> {
        let element = self
            .elements
            .get_mut(target)
            .ok_or_else(|| SurfaceError::MissingTarget(target.clone()))?;

        // Validate the whole frame first so a rejected write leaves no trace
        if let Some((property, value)) = frame.values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SurfaceError::Rejected {
                target: target.clone(),
                property: *property,
                value: *value,
            });
        }
        for (property, value) in &frame.values {
            element.set(*property, *value);
        }
        self.revision += 1;
        Ok(())
    }

    fn place(&mut self, target: &TargetId, placement: Placement) -> Result<(), SurfaceError> {
        let element = self
            .elements
            .get_mut(target)
            .ok_or_else(|| SurfaceError::MissingTarget(target.clone()))?;
        if !placement.is_finite() {
            return Err(SurfaceError::InvalidPlacement(target.clone()));
        }
        element.placement = placement;
        self.revision += 1;
        Ok(())
    }
}
