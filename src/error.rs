use thiserror::Error;

use crate::messaging::EventKind;

/// Domain errors using thiserror for structured error handling.
///
/// None of these are fatal to the process. The worst outcome is an overlay
/// that fails to appear, which the user can recover with a manual toggle.

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Game event platform is unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Failed to read from the game event feed")]
    FeedRead(#[source] std::io::Error),

    #[error("Malformed platform message: {line}")]
    Malformed {
        line: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Subscriber {subscription} failed while handling {event}")]
    SubscriberFailure {
        event: EventKind,
        subscription: u64,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Subscriber {subscription} panicked while handling {event}: {message}")]
    SubscriberPanicked {
        event: EventKind,
        subscription: u64,
        message: String,
    },
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Invalid value for {field}: {value} (must be {min}-{max})")]
    InvalidValue {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Malformed settings payload")]
    Malformed(#[source] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum HotkeyError {
    #[error("Failed to create global hotkey manager")]
    ManagerUnavailable(#[source] global_hotkey::Error),

    #[error("Invalid hotkey binding: {0}")]
    InvalidBinding(String),

    #[error("Failed to register hotkey {binding}")]
    RegisterFailed {
        binding: String,
        #[source]
        source: global_hotkey::Error,
    },

    #[error("Failed to start hotkey listener")]
    ListenerFailed(#[source] std::io::Error),

    #[error("Global hotkeys are not supported here: {0}")]
    Unsupported(&'static str),
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        let err = SettingsError::InvalidValue {
            field: "timerDuration",
            value: 200,
            min: 1,
            max: 120,
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for timerDuration: 200 (must be 1-120)"
        );

        let err = PlatformError::Unavailable {
            reason: "no feed".to_string(),
        };
        assert_eq!(err.to_string(), "Game event platform is unavailable: no feed");
    }

    #[test]
    fn test_error_source_chain() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let config_err = ConfigError::LoadFailed {
            path: "/test/config.json".to_string(),
            source: Box::new(io_err),
        };

        assert!(config_err.source().is_some());
        assert_eq!(
            config_err.to_string(),
            "Failed to load configuration from /test/config.json"
        );
    }

    #[test]
    fn test_subscriber_failure_keeps_cause() {
        let err = DispatchError::SubscriberFailure {
            event: EventKind::CountdownStart,
            subscription: 3,
            source: anyhow::anyhow!("overlay gone").into(),
        };
        assert_eq!(
            err.to_string(),
            "Subscriber 3 failed while handling countdown-start"
        );
        assert_eq!(err.source().map(|e| e.to_string()), Some("overlay gone".to_string()));
    }
}
