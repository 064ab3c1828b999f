//! Animation engine
//!
//! Framework-independent simulators and the transition scheduler. Nothing
//! here touches the ECS beyond deriving `Resource`; the Bevy systems in
//! [`crate::systems`] drive these with the right clocks.

pub mod bounce;
pub mod easing;
pub mod orbital;
pub mod orchestrator;
pub mod smoothing;
pub mod timeline;

pub use bounce::BounceSimulator;
pub use easing::Easing;
pub use orbital::{OrbitalGestureController, ViewportClass};
pub use orchestrator::{Orchestrator, SequenceEvent, SequenceHandle, ViewId};
pub use timeline::{Position, Step, TransitionSequence};
