/// Demo event source
///
/// Used when the game platform cannot be reached. Optionally plants a spike
/// after a short delay, then reads simple commands from the console.
use crossbeam_channel::{after, Sender};
use std::io::{self, BufRead, BufReader};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::GameEventSource;
use crate::app::AppMessage;
use crate::error::PlatformError;
use crate::messaging::Command;
use crate::state::SettingsPatch;

pub const CONSOLE_HELP: &str = "Commands: plant | defuse | overlay | settings | hide | \
duration <secs> | sound on|off | move <x> <y> | size <w> <h> | quit";

pub struct DemoSource {
    auto_start_delay: Option<Duration>,
    input: Box<dyn BufRead + Send>,
}

impl DemoSource {
    pub fn new(auto_start_delay: Option<Duration>, input: Box<dyn BufRead + Send>) -> Self {
        Self {
            auto_start_delay,
            input,
        }
    }

    /// Read commands from stdin
    pub fn console(auto_start_delay: Option<Duration>) -> Self {
        Self::new(auto_start_delay, Box::new(BufReader::new(io::stdin())))
    }

    fn spawn_auto_start(
        delay: Duration,
        tx: Sender<AppMessage>,
    ) -> Result<JoinHandle<()>, PlatformError> {
        thread::Builder::new()
            .name("demo-autostart".to_string())
            .spawn(move || {
                let _ = after(delay).recv();
                tracing::info!("Demo: planting spike");
                let _ = tx.send(AppMessage::Command(Command::SimulateCountdownStart));
            })
            .map_err(|e| PlatformError::Unavailable {
                reason: format!("cannot start demo timer: {}", e),
            })
    }

    /// Forward console commands until `quit` or end of input.
    ///
    /// At end of input the source only reports itself closed once a pending
    /// auto-start has posted its plant.
    fn read_console(
        input: Box<dyn BufRead + Send>,
        tx: Sender<AppMessage>,
        pending_plant: Option<JoinHandle<()>>,
    ) {
        for line in input.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::error!("{:#}", anyhow::Error::from(PlatformError::FeedRead(e)));
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            match parse_command(&line) {
                Some(command) => {
                    let quit = command == Command::Quit;
                    if tx.send(AppMessage::Command(command)).is_err() || quit {
                        return;
                    }
                }
                None => {
                    tracing::warn!(input = %line.trim(), "Unknown command. {}", CONSOLE_HELP)
                }
            }
        }

        if let Some(handle) = pending_plant {
            if handle.join().is_err() {
                tracing::error!("Demo auto-start thread panicked");
            }
        }
        let _ = tx.send(AppMessage::SourceClosed("demo"));
    }
}

impl GameEventSource for DemoSource {
    fn name(&self) -> &'static str {
        "demo"
    }

    fn start(self: Box<Self>, tx: Sender<AppMessage>) -> Result<JoinHandle<()>, PlatformError> {
        let DemoSource {
            auto_start_delay,
            input,
        } = *self;

        let pending_plant = match auto_start_delay {
            Some(delay) => {
                tracing::info!("Demo: spike will be planted in {:?}", delay);
                Some(Self::spawn_auto_start(delay, tx.clone())?)
            }
            None => None,
        };
        tracing::info!("{}", CONSOLE_HELP);

        thread::Builder::new()
            .name("demo-console".to_string())
            .spawn(move || Self::read_console(input, tx, pending_plant))
            .map_err(|e| PlatformError::Unavailable {
                reason: format!("cannot start demo console: {}", e),
            })
    }
}

/// Parse one console line into a command
pub fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let verb = words.next()?.to_ascii_lowercase();
    let args: Vec<&str> = words.collect();

    let command = match (verb.as_str(), args.as_slice()) {
        ("plant", []) => Command::SimulateCountdownStart,
        ("defuse", []) => Command::SimulateCountdownCancel,
        ("overlay", []) => Command::ToggleOverlay,
        ("settings", []) => Command::ToggleSettings,
        ("hide", []) => Command::HideOverlay,
        ("get", []) => Command::GetSettings,
        ("duration", [secs]) => Command::SaveSettings {
            patch: SettingsPatch::duration(secs.parse().ok()?),
        },
        ("sound", ["on"]) => Command::SaveSettings {
            patch: SettingsPatch::sound(true),
        },
        ("sound", ["off"]) => Command::SaveSettings {
            patch: SettingsPatch::sound(false),
        },
        ("move", [x, y]) => Command::OverlayMoved {
            x: x.parse().ok()?,
            y: y.parse().ok()?,
        },
        ("size", [width, height]) => Command::SaveSettings {
            patch: SettingsPatch::size(width.parse().ok()?, height.parse().ok()?),
        },
        ("quit" | "exit", []) => Command::Quit,
        _ => return None,
    };

    Some(command)
}
