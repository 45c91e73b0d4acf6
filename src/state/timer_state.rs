/// Countdown state snapshot
///
/// `remaining_secs <= total_secs` always holds, and an idle timer has no
/// remaining time.
use serde::Serialize;

/// Lifecycle of the countdown
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
pub enum TimerStatus {
    /// No countdown in progress
    #[default]
    Idle,

    /// Counting down once per tick
    Running,
}

impl TimerStatus {
    pub fn is_idle(&self) -> bool {
        matches!(self, TimerStatus::Idle)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, TimerStatus::Running)
    }

    /// Get a human-readable description of the status
    pub fn description(&self) -> &'static str {
        match self {
            TimerStatus::Idle => "Idle",
            TimerStatus::Running => "Running",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub status: TimerStatus,
    pub remaining_secs: u32,
    pub total_secs: u32,
}

impl TimerState {
    /// Idle state remembering the length of the last run
    pub fn idle(total_secs: u32) -> Self {
        Self {
            status: TimerStatus::Idle,
            remaining_secs: 0,
            total_secs: total_secs.max(1),
        }
    }

    pub fn running(total_secs: u32) -> Self {
        Self {
            status: TimerStatus::Running,
            remaining_secs: total_secs,
            total_secs,
        }
    }

    /// Check the state invariants
    pub fn is_consistent(&self) -> bool {
        self.total_secs >= 1
            && self.remaining_secs <= self.total_secs
            && (self.status.is_running() || self.remaining_secs == 0)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::idle(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_status_predicates() {
        assert!(TimerStatus::Idle.is_idle());
        assert!(!TimerStatus::Idle.is_running());
        assert!(TimerStatus::Running.is_running());
        assert_eq!(TimerStatus::default(), TimerStatus::Idle);
    }

    #[test]
    fn test_constructed_states_are_consistent() {
        assert!(TimerState::default().is_consistent());
        assert!(TimerState::idle(45).is_consistent());
        assert!(TimerState::running(45).is_consistent());
    }

    #[test]
    fn test_idle_with_time_left_is_inconsistent() {
        let state = TimerState {
            status: TimerStatus::Idle,
            remaining_secs: 3,
            total_secs: 45,
        };
        assert!(!state.is_consistent());
    }
}
