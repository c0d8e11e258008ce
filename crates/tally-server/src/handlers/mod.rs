//! HTTP request handlers organized by domain

pub mod forecast;
pub mod health;

// Re-export all handlers for use in router
pub use forecast::*;
pub use health::*;
