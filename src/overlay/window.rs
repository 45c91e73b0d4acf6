/// Overlay and settings window bookkeeping
///
/// Tracks what is visible and tells the presentation layer about changes.
/// Window creation itself belongs to the presentation shell.
use parking_lot::Mutex;
use std::sync::Arc;

use super::presenter::{PresentationMessage, Presenter};
use crate::messaging::{Dispatcher, DomainEvent, EventKind, SubscriptionHandle};
use crate::state::{Settings, SettingsStore};

pub struct WindowShell {
    presenter: Arc<dyn Presenter>,
    settings: SettingsStore,
    overlay_visible: bool,
    settings_visible: bool,
}

impl WindowShell {
    pub fn new(presenter: Arc<dyn Presenter>, settings: SettingsStore) -> Self {
        Self {
            presenter,
            settings,
            overlay_visible: false,
            settings_visible: false,
        }
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    pub fn settings_visible(&self) -> bool {
        self.settings_visible
    }

    pub fn show_overlay(&mut self) {
        if !self.overlay_visible {
            self.overlay_visible = true;
            self.presenter.present(PresentationMessage::ShowOverlay);
        }
    }

    pub fn hide_overlay(&mut self) {
        if self.overlay_visible {
            self.overlay_visible = false;
            self.presenter.present(PresentationMessage::HideOverlay);
        }
    }

    pub fn toggle_overlay(&mut self) {
        if self.overlay_visible {
            self.hide_overlay();
        } else {
            self.show_overlay();
        }
    }

    /// Show the settings panel and populate it with the current settings
    pub fn show_settings(&mut self) {
        if !self.settings_visible {
            self.settings_visible = true;
            self.presenter.present(PresentationMessage::ShowSettings);
        }
        self.presenter.present(PresentationMessage::LoadSettings {
            settings: self.settings.get(),
        });
    }

    pub fn hide_settings(&mut self) {
        if self.settings_visible {
            self.settings_visible = false;
            self.presenter.present(PresentationMessage::HideSettings);
        }
    }

    pub fn toggle_settings(&mut self) {
        if self.settings_visible {
            self.hide_settings();
        } else {
            self.show_settings();
        }
    }

    /// Move/resize the overlay to match `settings`
    pub fn apply_geometry(&self, settings: &Settings) {
        self.presenter.present(PresentationMessage::ApplyGeometry {
            position: settings.overlay_position,
            size: settings.overlay_size,
        });
    }

    /// Follow the game lifecycle: show the overlay while the game runs.
    ///
    /// Only visibility changes here; the countdown is left alone.
    pub fn attach(
        shell: &Arc<Mutex<WindowShell>>,
        dispatcher: &Dispatcher,
    ) -> Vec<SubscriptionHandle> {
        let started = Arc::clone(shell);
        let stopped = Arc::clone(shell);

        vec![
            dispatcher.subscribe(EventKind::GameStarted, move |_: &DomainEvent| {
                tracing::info!("Target game is running, showing overlay");
                started.lock().show_overlay();
                Ok(())
            }),
            dispatcher.subscribe(EventKind::GameStopped, move |_: &DomainEvent| {
                tracing::info!("Target game is not running, hiding overlay");
                stopped.lock().hide_overlay();
                Ok(())
            }),
        ]
    }
}
