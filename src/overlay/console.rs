//! Terminal presentation shell
//!
//! Renders the countdown as text lines. Used when no graphical overlay is
//! attached to the process.

use parking_lot::Mutex;
use std::io::Write;

use super::display::{TimerDisplay, TITLE};
use super::presenter::{PresentationMessage, Presenter};

const BELL: &str = "\x07";

pub struct ConsolePresenter<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn render(message: &PresentationMessage) -> Option<String> {
        let line = match message {
            PresentationMessage::StartTimer { duration_secs } => {
                TimerDisplay::new(*duration_secs).render_line()
            }
            PresentationMessage::TimerTick { remaining_secs } => {
                TimerDisplay::new(*remaining_secs).render_line()
            }
            PresentationMessage::StopTimer => format!("   {} (stopped)", TITLE),
            PresentationMessage::TimerComplete => format!("   {} (time up)", TITLE),
            PresentationMessage::PlayWarning => BELL.to_string(),
            PresentationMessage::LoadSettings { settings } => format!(
                "[settings] duration={}s sound={} position=({}, {}) size={}x{}",
                settings.timer_duration_secs,
                if settings.sound_enabled { "on" } else { "off" },
                settings.overlay_position.x,
                settings.overlay_position.y,
                settings.overlay_size.width,
                settings.overlay_size.height,
            ),
            PresentationMessage::ShowOverlay => "[overlay shown]".to_string(),
            PresentationMessage::HideOverlay => "[overlay hidden]".to_string(),
            PresentationMessage::ShowSettings => "[settings panel opened]".to_string(),
            PresentationMessage::HideSettings => "[settings panel closed]".to_string(),
            PresentationMessage::ApplyGeometry { .. } => return None,
        };
        Some(line)
    }
}

impl<W: Write + Send> Presenter for ConsolePresenter<W> {
    fn present(&self, message: PresentationMessage) {
        let Some(line) = Self::render(&message) else {
            return;
        };

        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            tracing::warn!("Failed to write {} to console: {}", message.name(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(messages: &[PresentationMessage]) -> Vec<String> {
        let console = ConsolePresenter::new(Vec::new());
        for message in messages {
            console.present(*message);
        }
        String::from_utf8(console.into_inner())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_countdown_lines() {
        let lines = rendered(&[
            PresentationMessage::StartTimer { duration_secs: 45 },
            PresentationMessage::TimerTick { remaining_secs: 9 },
            PresentationMessage::StopTimer,
        ]);

        assert_eq!(
            lines,
            vec![
                "   SPIKE PLANTED 45 seconds remaining",
                "!  SPIKE PLANTED 09 seconds remaining",
                "   SPIKE PLANTED (stopped)",
            ]
        );
    }

    #[test]
    fn test_warning_rings_bell() {
        let lines = rendered(&[PresentationMessage::PlayWarning]);
        assert_eq!(lines, vec![BELL]);
    }

    #[test]
    fn test_geometry_is_not_printed() {
        let settings = crate::state::Settings::default();
        let lines = rendered(&[PresentationMessage::ApplyGeometry {
            position: settings.overlay_position,
            size: settings.overlay_size,
        }]);
        assert!(lines.is_empty());
    }
}
