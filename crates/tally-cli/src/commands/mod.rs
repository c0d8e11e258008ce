//! CLI command implementations
//!
//! - `config` - Configuration loading and display
//! - `predict` - One-off forecast from the backend or a file
//! - `serve` - Web server command

pub mod config;
pub mod predict;
pub mod serve;

// Re-export command functions for main.rs
pub use config::*;
pub use predict::*;
pub use serve::*;
