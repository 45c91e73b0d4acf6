/// State management module
///
/// Settings with validation, the shared settings store and the countdown state.

pub mod settings;
pub mod store;
pub mod timer_state;

// Re-export commonly used types
pub use settings::{OverlayPosition, OverlaySize, Settings, SettingsPatch, SizePatch};
pub use store::SettingsStore;
pub use timer_state::{TimerState, TimerStatus};
