//! Core application functionality
//!
//! This module contains the core application logic, including:
//! - Application initialization and configuration
//! - State management
//! - Settings and CLI handling
//! - Error types shared by the engine

pub mod app;
pub mod config;
pub mod errors;
pub mod platform;
pub mod runner;
pub mod state;

// Re-export commonly used items
pub use app::create_app;
pub use config::{CliArgs, EngineSettings};
pub use errors::{EngineError, EngineResult};
pub use runner::run_app;
pub use state::ThemeStateStore;
