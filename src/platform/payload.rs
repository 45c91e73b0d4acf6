/// Raw message shapes delivered by the game-event platform
///
/// These are decoded once here. Everything downstream works with
/// [`DomainEvent`](crate::messaging::DomainEvent) instead of raw names.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PlatformError;

/// A single raw game event, e.g. `{"name": "bomb_planted", "data": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGameEvent {
    /// Empty when the platform omits it; such events match nothing
    #[serde(default)]
    pub name: String,

    /// Everything besides the name, kept for logging
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawGameEvent {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: Map::new(),
        }
    }
}

/// Batched notification `{events: [...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEventBatch {
    pub events: Vec<RawGameEvent>,
}

/// Game lifecycle state `{isRunning, id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    pub is_running: bool,

    /// Platform game identifier; absent when nothing is running
    #[serde(default)]
    pub id: i64,
}

/// One line of the platform feed
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PlatformMessage {
    /// New game events
    Events(RawEventBatch),

    /// Lifecycle change, wrapped as the platform's update callback sends it
    GameInfoUpdate {
        #[serde(rename = "gameInfo")]
        game_info: GameInfo,
    },

    /// Lifecycle state, as returned by the running-game query
    GameInfo(GameInfo),

    /// Key/value info updates; not used by the countdown
    InfoUpdate { info: Value },
}

impl PlatformMessage {
    /// Decode one feed line
    pub fn parse(line: &str) -> Result<Self, PlatformError> {
        serde_json::from_str(line).map_err(|source| PlatformError::Malformed {
            line: line.to_string(),
            source,
        })
    }

    pub fn events(names: &[&str]) -> Self {
        PlatformMessage::Events(RawEventBatch {
            events: names.iter().map(|name| RawGameEvent::named(name)).collect(),
        })
    }
}

/// Raw event names the countdown reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEventName {
    SpikePlanted,
    SpikeDefused,
    RoundStart,
    RoundEnd,
}

impl GameEventName {
    /// Decode a raw name. Both spellings used by the platform are accepted.
    pub fn from_raw(name: &str) -> Option<Self> {
        match name {
            "bomb_planted" | "spike_planted" | "spike-planted" => Some(GameEventName::SpikePlanted),
            "bomb_defused" | "spike_defused" | "spike-defused" => Some(GameEventName::SpikeDefused),
            "round_start" | "round-start" => Some(GameEventName::RoundStart),
            "round_end" | "round-end" => Some(GameEventName::RoundEnd),
            _ => None,
        }
    }

    /// Features to request from the platform
    pub const REQUIRED_FEATURES: [&'static str; 4] =
        ["bomb_planted", "bomb_defused", "round_start", "round_end"];
}
