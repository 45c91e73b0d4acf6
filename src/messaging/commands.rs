/// Command types for the application
///
/// Commands represent requests from the presentation layer and the global
/// hotkeys (imperative). They are executed by the command executor and never
/// touch the countdown directly: anything timer-related goes through the
/// dispatcher as a domain event.
use crate::state::{Settings, SettingsPatch};

/// Application commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `get-settings()`
    GetSettings,

    /// `save-settings(partial)`
    SaveSettings { patch: SettingsPatch },

    /// `simulate-countdown-start()`: demo plant with the configured duration
    SimulateCountdownStart,

    /// Demo defuse
    SimulateCountdownCancel,

    /// `hide-overlay()`
    HideOverlay,

    /// Global action: show/hide the overlay
    ToggleOverlay,

    /// Global action: show/hide the settings panel
    ToggleSettings,

    /// The user dragged the overlay window
    OverlayMoved { x: i32, y: i32 },

    /// Quit the application
    Quit,
}

/// Result of command execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Command executed successfully
    Success,

    /// Command produced the resulting settings
    Settings(Settings),
}

impl Command {
    /// Get a human-readable description of the command
    pub fn description(&self) -> String {
        match self {
            Command::GetSettings => "Get settings".to_string(),
            Command::SaveSettings { patch } => format!("Save settings: {:?}", patch),
            Command::SimulateCountdownStart => "Simulate countdown start".to_string(),
            Command::SimulateCountdownCancel => "Simulate countdown cancel".to_string(),
            Command::HideOverlay => "Hide overlay".to_string(),
            Command::ToggleOverlay => "Toggle overlay".to_string(),
            Command::ToggleSettings => "Toggle settings".to_string(),
            Command::OverlayMoved { x, y } => format!("Overlay moved to ({}, {})", x, y),
            Command::Quit => "Quit application".to_string(),
        }
    }
}
