/// Countdown state machine
///
/// Pure logic with no clock of its own: the owner calls [`CountdownTimer::tick`]
/// once per elapsed period and forwards the returned notifications.
///
/// ```text
///            start(d)                 tick (remaining > 0)
///   Idle ───────────────> Running ──────────────────────┐
///    ^                     │  ^                         │
///    │  cancel / reaches 0 │  └─────────────────────────┘
///    └─────────────────────┘      start(d) restarts from d
/// ```
use crate::state::{TimerState, TimerStatus};

/// Seconds remaining at which the low-time warning fires
pub const DEFAULT_WARNING_THRESHOLD_SECS: u32 = 10;

/// Output of a timer transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerNotification {
    /// Countdown (re)started with this many seconds
    Started { duration_secs: u32, restarted: bool },

    /// One second elapsed
    Tick { remaining_secs: u32 },

    /// Remaining time crossed the warning threshold (sound enabled only)
    Threshold { remaining_secs: u32 },

    /// Countdown ran out
    Completed,

    /// Side effect request that follows [`TimerNotification::Completed`]
    HideOverlayRequested,

    /// Countdown was silenced before running out
    Cancelled { remaining_secs: u32 },
}

pub struct CountdownTimer {
    state: TimerState,
    warning_threshold_secs: u32,
    threshold_fired: bool,
}

impl CountdownTimer {
    pub fn new(warning_threshold_secs: u32) -> Self {
        Self {
            state: TimerState::default(),
            warning_threshold_secs,
            threshold_fired: false,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status
    }

    pub fn warning_threshold_secs(&self) -> u32 {
        self.warning_threshold_secs
    }

    /// Whether the warning already fired during the current run
    pub fn threshold_fired(&self) -> bool {
        self.threshold_fired
    }

    /// Start counting down from `duration_secs`, overwriting any run in progress
    pub fn start(&mut self, duration_secs: u32) -> TimerNotification {
        let duration_secs = duration_secs.max(1);
        let restarted = self.state.status.is_running();

        self.state = TimerState::running(duration_secs);
        self.threshold_fired = false;

        TimerNotification::Started {
            duration_secs,
            restarted,
        }
    }

    /// Drop the current run. Returns `None` when nothing was running.
    pub fn cancel(&mut self) -> Option<TimerNotification> {
        if !self.state.status.is_running() {
            return None;
        }

        let remaining_secs = self.state.remaining_secs;
        self.state = TimerState::idle(self.state.total_secs);
        Some(TimerNotification::Cancelled { remaining_secs })
    }

    /// Advance by exactly one second. Ticks while idle are ignored.
    pub fn tick(&mut self, sound_enabled: bool) -> Vec<TimerNotification> {
        if !self.state.status.is_running() {
            return Vec::new();
        }

        let previous = self.state.remaining_secs;
        let remaining_secs = previous.saturating_sub(1);
        self.state.remaining_secs = remaining_secs;

        let mut notifications = vec![TimerNotification::Tick { remaining_secs }];

        let crossed = previous > self.warning_threshold_secs
            && remaining_secs <= self.warning_threshold_secs;
        if crossed && !self.threshold_fired {
            // The crossing happens once per run whether or not it is audible
            self.threshold_fired = true;
            if sound_enabled {
                notifications.push(TimerNotification::Threshold { remaining_secs });
            }
        }

        if remaining_secs == 0 {
            self.state = TimerState::idle(self.state.total_secs);
            notifications.push(TimerNotification::Completed);
            notifications.push(TimerNotification::HideOverlayRequested);
        }

        notifications
    }
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new(DEFAULT_WARNING_THRESHOLD_SECS)
    }
}
