/// Domain events for the countdown
///
/// Events represent things that happened in the game (past tense).
/// Raw platform payloads are decoded into this closed set once, at the
/// platform adapter boundary, and broadcast through the dispatcher.
use std::fmt;

/// Normalized game events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainEvent {
    /// The target game is running
    GameStarted,

    /// The target game stopped (or another game is in focus)
    GameStopped,

    /// Start (or restart) a countdown of the given length
    CountdownStart { duration_secs: u32 },

    /// Silence the countdown without completing it
    CountdownCancel,
}

/// Subscription key for a [`DomainEvent`], one per variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    GameStarted,
    GameStopped,
    CountdownStart,
    CountdownCancel,
}

impl DomainEvent {
    /// Get the subscription key of this event
    pub fn kind(&self) -> EventKind {
        match self {
            DomainEvent::GameStarted => EventKind::GameStarted,
            DomainEvent::GameStopped => EventKind::GameStopped,
            DomainEvent::CountdownStart { .. } => EventKind::CountdownStart,
            DomainEvent::CountdownCancel => EventKind::CountdownCancel,
        }
    }

    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            DomainEvent::GameStarted => "Game started".to_string(),
            DomainEvent::GameStopped => "Game stopped".to_string(),
            DomainEvent::CountdownStart { duration_secs } => {
                format!("Countdown start ({}s)", duration_secs)
            }
            DomainEvent::CountdownCancel => "Countdown cancel".to_string(),
        }
    }
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::GameStarted,
        EventKind::GameStopped,
        EventKind::CountdownStart,
        EventKind::CountdownCancel,
    ];

    /// Stable event name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::GameStarted => "game-started",
            EventKind::GameStopped => "game-stopped",
            EventKind::CountdownStart => "countdown-start",
            EventKind::CountdownCancel => "countdown-cancel",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
