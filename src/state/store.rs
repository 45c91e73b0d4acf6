/// In-memory settings store
///
/// Readers always receive a value copy. Writes replace the whole snapshot,
/// so a reader never observes a half-merged update.
use parking_lot::RwLock;
use std::sync::Arc;

use super::settings::{Settings, SettingsPatch};

#[derive(Clone, Default)]
pub struct SettingsStore {
    current: Arc<RwLock<Settings>>,
}

impl SettingsStore {
    /// Create a store holding `initial`, clamped into range
    pub fn new(initial: Settings) -> Self {
        let (settings, adjustments) = initial.sanitized();
        for adjustment in &adjustments {
            tracing::warn!("Initial settings adjusted: {}", adjustment);
        }

        Self {
            current: Arc::new(RwLock::new(settings)),
        }
    }

    /// Current settings snapshot
    pub fn get(&self) -> Settings {
        *self.current.read()
    }

    /// Merge `patch` into the current settings and return the result.
    ///
    /// Out-of-range values are clamped and logged.
    pub fn update(&self, patch: &SettingsPatch) -> Settings {
        let mut current = self.current.write();
        let (next, adjustments) = current.merged(patch);

        for adjustment in &adjustments {
            tracing::warn!("Clamped settings value: {}", adjustment);
        }

        *current = next;
        tracing::info!(
            duration = next.timer_duration_secs,
            sound = next.sound_enabled,
            x = next.overlay_position.x,
            y = next.overlay_position.y,
            width = next.overlay_size.width,
            height = next.overlay_size.height,
            "Settings saved"
        );
        next
    }

    pub fn timer_duration_secs(&self) -> u32 {
        self.current.read().timer_duration_secs
    }

    pub fn sound_enabled(&self) -> bool {
        self.current.read().sound_enabled
    }
}
