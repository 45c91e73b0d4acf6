/// Event Source Adapter
///
/// Translates platform messages into [`DomainEvent`]s and publishes them on
/// the dispatcher, one event per raw event, in batch order.
use super::payload::{GameEventName, GameInfo, PlatformMessage, RawEventBatch};
use crate::messaging::{Dispatcher, DomainEvent};
use crate::state::SettingsStore;

/// Platform identifier of the game the overlay is built for
pub const DEFAULT_TARGET_GAME_ID: i64 = 21640;

pub struct EventSourceAdapter {
    dispatcher: Dispatcher,
    settings: SettingsStore,
    target_game_id: i64,
}

impl EventSourceAdapter {
    pub fn new(dispatcher: Dispatcher, settings: SettingsStore, target_game_id: i64) -> Self {
        Self {
            dispatcher,
            settings,
            target_game_id,
        }
    }

    pub fn target_game_id(&self) -> i64 {
        self.target_game_id
    }

    /// Handle one platform message
    pub fn handle_message(&self, message: &PlatformMessage) {
        match message {
            PlatformMessage::Events(batch) => {
                self.handle_batch(batch);
            }
            PlatformMessage::GameInfoUpdate { game_info }
            | PlatformMessage::GameInfo(game_info) => {
                self.handle_game_info(game_info);
            }
            PlatformMessage::InfoUpdate { info } => {
                tracing::debug!(%info, "Ignoring game info update");
            }
        }
    }

    /// Publish every recognized event of `batch`. Returns how many were published.
    pub fn handle_batch(&self, batch: &RawEventBatch) -> usize {
        let mut published = 0;

        for raw in &batch.events {
            match self.translate(&raw.name) {
                Some(event) => {
                    tracing::info!(name = %raw.name, "{}", event.description());
                    self.dispatcher.publish(event);
                    published += 1;
                }
                None => tracing::trace!(name = %raw.name, "Ignoring unrecognized game event"),
            }
        }

        published
    }

    /// Map a raw event name to a domain event
    pub fn translate(&self, name: &str) -> Option<DomainEvent> {
        let event = match GameEventName::from_raw(name)? {
            GameEventName::SpikePlanted => DomainEvent::CountdownStart {
                duration_secs: self.settings.timer_duration_secs(),
            },
            // A new round always starts without a live spike
            GameEventName::SpikeDefused | GameEventName::RoundEnd | GameEventName::RoundStart => {
                DomainEvent::CountdownCancel
            }
        };
        Some(event)
    }

    /// Publish the lifecycle event matching `info`
    pub fn handle_game_info(&self, info: &GameInfo) {
        let event = if info.is_running && info.id == self.target_game_id {
            DomainEvent::GameStarted
        } else {
            DomainEvent::GameStopped
        };

        tracing::debug!(running = info.is_running, id = info.id, "{}", event.description());
        self.dispatcher.publish(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::EventKind;
    use crate::state::SettingsPatch;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn recording_adapter() -> (EventSourceAdapter, SettingsStore, Arc<Mutex<Vec<DomainEvent>>>) {
        let dispatcher = Dispatcher::new();
        let settings = SettingsStore::default();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for kind in EventKind::ALL {
            let sink = Arc::clone(&seen);
            dispatcher.subscribe(kind, move |event| {
                sink.lock().push(*event);
                Ok(())
            });
        }

        (
            EventSourceAdapter::new(dispatcher, settings.clone(), DEFAULT_TARGET_GAME_ID),
            settings,
            seen,
        )
    }

    #[test]
    fn test_batch_preserves_order_and_skips_unknown() {
        let (adapter, _, seen) = recording_adapter();
        let message =
            PlatformMessage::events(&["kill", "bomb_planted", "headshot", "bomb_defused"]);

        adapter.handle_message(&message);

        assert_eq!(
            *seen.lock(),
            vec![
                DomainEvent::CountdownStart { duration_secs: 45 },
                DomainEvent::CountdownCancel
            ]
        );
    }

    #[test]
    fn test_batch_reports_published_count() {
        let (adapter, _, _) = recording_adapter();
        let message = PlatformMessage::events(&["round_start", "x", "round_end"]);
        let PlatformMessage::Events(batch) = message else {
            unreachable!();
        };
        assert_eq!(adapter.handle_batch(&batch), 2);
    }

    #[test]
    fn test_plant_duration_comes_from_settings() {
        let (adapter, settings, _) = recording_adapter();
        settings.update(&SettingsPatch::duration(30));

        assert_eq!(
            adapter.translate("spike-planted"),
            Some(DomainEvent::CountdownStart { duration_secs: 30 })
        );
    }

    #[test]
    fn test_game_info_requires_target_game() {
        let (adapter, _, seen) = recording_adapter();

        adapter.handle_game_info(&GameInfo {
            is_running: true,
            id: DEFAULT_TARGET_GAME_ID,
        });
        adapter.handle_game_info(&GameInfo {
            is_running: true,
            id: 5426,
        });
        adapter.handle_game_info(&GameInfo {
            is_running: false,
            id: DEFAULT_TARGET_GAME_ID,
        });

        assert_eq!(
            *seen.lock(),
            vec![
                DomainEvent::GameStarted,
                DomainEvent::GameStopped,
                DomainEvent::GameStopped
            ]
        );
    }

    #[test]
    fn test_info_updates_publish_nothing() {
        let (adapter, _, seen) = recording_adapter();
        adapter.handle_message(&PlatformMessage::InfoUpdate {
            info: serde_json::json!({"match_info": {}}),
        });
        assert!(seen.lock().is_empty());
    }
}
