/// Outbound messages to the presentation layer
///
/// The overlay window and the settings panel are external collaborators.
/// Everything they need to render arrives as a [`PresentationMessage`]
/// through a [`Presenter`].
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use serde::Serialize;
use std::io::Write;

use crate::state::{OverlayPosition, OverlaySize, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum PresentationMessage {
    /// Start rendering a countdown
    StartTimer { duration_secs: u32 },

    /// Stop rendering the countdown, discarding remaining time
    StopTimer,

    /// Re-render with the new remaining time
    TimerTick { remaining_secs: u32 },

    /// The countdown ran out
    TimerComplete,

    /// Play the low-time warning beep
    PlayWarning,

    /// Populate the settings panel
    LoadSettings { settings: Settings },

    ShowOverlay,
    HideOverlay,
    ShowSettings,
    HideSettings,

    /// Move/resize the overlay window
    ApplyGeometry {
        position: OverlayPosition,
        size: OverlaySize,
    },
}

impl PresentationMessage {
    /// Wire name of the message
    pub fn name(&self) -> &'static str {
        match self {
            PresentationMessage::StartTimer { .. } => "start-timer",
            PresentationMessage::StopTimer => "stop-timer",
            PresentationMessage::TimerTick { .. } => "timer-tick",
            PresentationMessage::TimerComplete => "timer-complete",
            PresentationMessage::PlayWarning => "play-warning",
            PresentationMessage::LoadSettings { .. } => "load-settings",
            PresentationMessage::ShowOverlay => "show-overlay",
            PresentationMessage::HideOverlay => "hide-overlay",
            PresentationMessage::ShowSettings => "show-settings",
            PresentationMessage::HideSettings => "hide-settings",
            PresentationMessage::ApplyGeometry { .. } => "apply-geometry",
        }
    }
}

/// Sink for presentation messages
pub trait Presenter: Send + Sync {
    fn present(&self, message: PresentationMessage);
}

/// Forwards messages over a channel (UI thread, tests)
pub struct ChannelPresenter {
    tx: Sender<PresentationMessage>,
}

impl ChannelPresenter {
    pub fn new(tx: Sender<PresentationMessage>) -> Self {
        Self { tx }
    }

    /// Create a presenter together with the receiving end
    pub fn channel() -> (Self, Receiver<PresentationMessage>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }
}

impl Presenter for ChannelPresenter {
    fn present(&self, message: PresentationMessage) {
        if self.tx.send(message).is_err() {
            tracing::debug!(message = message.name(), "Presentation receiver gone");
        }
    }
}

/// Writes one JSON object per line, for an out-of-process overlay shell
pub struct JsonLinesPresenter<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonLinesPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write + Send> Presenter for JsonLinesPresenter<W> {
    fn present(&self, message: PresentationMessage) {
        let line = match serde_json::to_string(&message) {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to encode {}: {}", message.name(), e);
                return;
            }
        };

        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            tracing::warn!("Failed to write {}: {}", message.name(), e);
        }
    }
}
