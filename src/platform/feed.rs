/// Newline-delimited JSON game-event feed
///
/// Each line is one [`PlatformMessage`]. The feed is read on its own thread
/// and every decoded message is posted to the app loop.
use crossbeam_channel::Sender;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::thread::{self, JoinHandle};

use super::payload::{GameEventName, PlatformMessage};
use super::GameEventSource;
use crate::app::AppMessage;
use crate::error::PlatformError;

pub struct FeedSource {
    label: String,
    reader: Box<dyn BufRead + Send>,
}

impl FeedSource {
    /// Read from any buffered reader
    pub fn from_reader(label: impl Into<String>, reader: Box<dyn BufRead + Send>) -> Self {
        Self {
            label: label.into(),
            reader,
        }
    }

    /// Open `-` (stdin) or a file path
    pub fn open(location: &str) -> Result<Self, PlatformError> {
        if location == "-" {
            return Ok(Self::from_reader("stdin", Box::new(BufReader::new(io::stdin()))));
        }

        let file = File::open(location).map_err(|e| PlatformError::Unavailable {
            reason: format!("cannot open feed {}: {}", location, e),
        })?;
        Ok(Self::from_reader(location, Box::new(BufReader::new(file))))
    }

    fn pump(self, tx: Sender<AppMessage>) {
        let FeedSource { label, reader } = self;

        for (index, line) in reader.lines().enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    let error = anyhow::Error::from(PlatformError::FeedRead(e));
                    tracing::error!(feed = %label, "{:#}", error);
                    break;
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match PlatformMessage::parse(trimmed) {
                Ok(message) => {
                    if tx.send(AppMessage::Platform(message)).is_err() {
                        tracing::debug!(feed = %label, "App loop gone, stopping feed");
                        return;
                    }
                }
                Err(e) => tracing::warn!(
                    feed = %label,
                    line = index + 1,
                    "Skipping line: {:#}",
                    anyhow::Error::from(e)
                ),
            }
        }

        tracing::info!(feed = %label, "Game event feed closed");
        let _ = tx.send(AppMessage::SourceClosed("feed"));
    }
}

impl GameEventSource for FeedSource {
    fn name(&self) -> &'static str {
        "feed"
    }

    fn start(self: Box<Self>, tx: Sender<AppMessage>) -> Result<JoinHandle<()>, PlatformError> {
        tracing::info!(
            feed = %self.label,
            features = ?GameEventName::REQUIRED_FEATURES,
            "Listening for game events"
        );

        thread::Builder::new()
            .name("event-feed".to_string())
            .spawn(move || (*self).pump(tx))
            .map_err(|e| PlatformError::Unavailable {
                reason: format!("cannot start feed reader: {}", e),
            })
    }
}
