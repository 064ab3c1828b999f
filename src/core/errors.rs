//! Error types for the animation engine
//!
//! None of these are fatal. Every failure degrades to "no visual change":
//! - missing references are expected during mount/unmount and are skipped silently
//! - invalid enumerations are logged and ignored
//! - animation failures abandon the affected sequence only

use thiserror::Error;

/// Result alias used by engine operations that can fail
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A container or target element is not mounted (yet, or anymore)
    #[error("target '{0}' is not mounted")]
    MissingReference(String),

    /// A value outside a closed enumeration, or a non-positive count
    #[error("invalid {kind}: '{value}'")]
    InvalidEnumeration { kind: &'static str, value: String },

    /// The presentation layer refused to apply a computed frame
    #[error("animation failed on '{target}': {reason}")]
    AnimationFailure { target: String, reason: String },

    /// Theme or settings data could not be parsed
    #[error("configuration error: {0}")]
    Config(String),
}

impl EngineError {
    pub fn invalid(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidEnumeration {
            kind,
            value: value.into(),
        }
    }

    /// Missing references are a normal transient state and are never logged
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::MissingReference(_))
    }
}
