//! Ricochet
//!
//! A bouncing logo, an orbit of items spun by wheel and touch, and a
//! themed transition engine, hosted in Bevy.
pub mod animation;
pub mod core;
pub mod geometry;
pub mod io;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;
pub mod rendering;
pub mod systems;
pub mod ui;
