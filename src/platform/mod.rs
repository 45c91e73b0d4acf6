/// Game-event platform integration
///
/// ## Architecture
///
/// ```text
/// ┌──────────────┐  AppMessage::Platform  ┌──────────┐  DomainEvent  ┌────────────┐
/// │ FeedSource   │ ─────────────────────> │ App loop │ ────────────> │ Dispatcher │
/// │ (or Demo)    │  AppMessage::Command   │ adapter  │               └────────────┘
/// └──────────────┘                        └──────────┘
/// ```
///
/// Sources only decode and post. Translation into domain events happens in
/// [`EventSourceAdapter`] on the app loop thread.
use crossbeam_channel::Sender;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::app::AppMessage;
use crate::error::PlatformError;

pub mod adapter;
pub mod demo;
pub mod feed;
pub mod payload;

// Re-export commonly used types
pub use adapter::{EventSourceAdapter, DEFAULT_TARGET_GAME_ID};
pub use demo::DemoSource;
pub use feed::FeedSource;
pub use payload::{GameEventName, GameInfo, PlatformMessage, RawEventBatch, RawGameEvent};

/// Something that produces platform messages or demo commands
pub trait GameEventSource: Send {
    fn name(&self) -> &'static str;

    /// Start producing messages on a background thread
    fn start(self: Box<Self>, tx: Sender<AppMessage>) -> Result<JoinHandle<()>, PlatformError>;
}

/// Connect to the platform feed at `location`
pub fn connect(location: Option<&str>) -> Result<FeedSource, PlatformError> {
    match location {
        Some(location) => FeedSource::open(location),
        None => Err(PlatformError::Unavailable {
            reason: "no game event feed configured".to_string(),
        }),
    }
}

/// Pick the event source, falling back to the demo source when the platform
/// is unavailable
pub fn select_source(
    location: Option<&str>,
    force_demo: bool,
    demo_auto_start: Option<Duration>,
) -> Box<dyn GameEventSource> {
    if force_demo {
        tracing::info!("Demo mode requested");
        return Box::new(DemoSource::console(demo_auto_start));
    }

    match connect(location) {
        Ok(feed) => Box::new(feed),
        Err(e) => {
            tracing::warn!("{}. Falling back to demo mode", e);
            Box::new(DemoSource::console(demo_auto_start))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_without_feed_is_unavailable() {
        assert!(matches!(connect(None), Err(PlatformError::Unavailable { .. })));
    }

    #[test]
    fn test_select_source_falls_back_to_demo() {
        assert_eq!(select_source(None, false, None).name(), "demo");
        assert_eq!(select_source(Some("/no/such/feed"), false, None).name(), "demo");
        assert_eq!(select_source(Some("-"), true, None).name(), "demo");
        assert_eq!(select_source(Some("-"), false, None).name(), "feed");
    }
}
