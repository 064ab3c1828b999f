//! Application state management.
//!
//! The theme store is the single writer of shared visual state; toggles
//! live inside it and are changed through the same entry point.

pub mod theme_store;
pub mod toggles;

// Re-export core state
pub use theme_store::{RootStyle, StoreAction, StoreEvent, SubscriptionId, ThemeStateStore};
pub use toggles::{Flag, SpeedVariant, ToggleControl, ToggleState, CONTROLS};
