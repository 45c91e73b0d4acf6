//! Spike timer library
//!
//! Game overlay countdown: platform game events are decoded into domain
//! events, dispatched to the countdown and the window shell, and rendered by
//! a presentation layer.

pub mod app;
pub mod config;
pub mod error;
pub mod hotkeys;
pub mod messaging;
pub mod overlay;
pub mod platform;
pub mod state;
pub mod timer;

// Re-export commonly used types
pub use app::{App, AppMessage};
pub use config::AppConfig;
