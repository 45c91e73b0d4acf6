/// Command executor
///
/// Executes presentation-layer commands against the settings store, the
/// window shell and the dispatcher.
use parking_lot::Mutex;
use std::sync::Arc;

use super::bus::Dispatcher;
use super::commands::{Command, CommandResult};
use super::events::DomainEvent;
use crate::overlay::WindowShell;
use crate::state::{SettingsPatch, SettingsStore};

/// Command executor that turns commands into state changes and events
pub struct CommandExecutor {
    dispatcher: Dispatcher,
    settings: SettingsStore,
    window: Arc<Mutex<WindowShell>>,
}

impl CommandExecutor {
    /// Create a new command executor
    pub fn new(
        dispatcher: Dispatcher,
        settings: SettingsStore,
        window: Arc<Mutex<WindowShell>>,
    ) -> Self {
        Self {
            dispatcher,
            settings,
            window,
        }
    }

    /// Execute a command immediately
    pub fn execute_sync(&self, command: Command) -> CommandResult {
        tracing::info!("Executing command: {}", command.description());

        match command {
            Command::GetSettings => CommandResult::Settings(self.settings.get()),
            Command::SaveSettings { patch } => {
                let before = self.settings.get();
                let saved = self.settings.update(&patch);
                if saved.geometry_differs(&before) {
                    self.window.lock().apply_geometry(&saved);
                }
                CommandResult::Settings(saved)
            }
            Command::SimulateCountdownStart => {
                let duration_secs = self.settings.timer_duration_secs();
                tracing::info!("Simulating spike plant...");
                self.dispatcher
                    .publish(DomainEvent::CountdownStart { duration_secs });
                CommandResult::Success
            }
            Command::SimulateCountdownCancel => {
                tracing::info!("Simulating spike defuse...");
                self.dispatcher.publish(DomainEvent::CountdownCancel);
                CommandResult::Success
            }
            Command::HideOverlay => {
                self.window.lock().hide_overlay();
                CommandResult::Success
            }
            Command::ToggleOverlay => {
                self.window.lock().toggle_overlay();
                CommandResult::Success
            }
            Command::ToggleSettings => {
                self.window.lock().toggle_settings();
                CommandResult::Success
            }
            Command::OverlayMoved { x, y } => {
                // Window is already there, only remember the position
                CommandResult::Settings(self.settings.update(&SettingsPatch::position(x, y)))
            }
            Command::Quit => {
                self.window.lock().hide_settings();
                CommandResult::Success
            }
        }
    }
}
