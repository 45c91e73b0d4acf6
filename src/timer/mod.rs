/// Countdown timer
///
/// ## Architecture
///
/// ```text
/// Dispatcher ──CountdownStart/Cancel──> TimerService ──> Presenter
///                                        │  ^
///                       schedule(1s)     │  │ Tick(run)
///                                        v  │
///                                      Scheduler
/// ```
///
/// [`CountdownTimer`] is the pure state machine, [`TimerService`] wires it
/// to the dispatcher and the tick schedule.

pub mod countdown;
pub mod schedule;
pub mod service;

// Re-export commonly used types
pub use countdown::{CountdownTimer, TimerNotification, DEFAULT_WARNING_THRESHOLD_SECS};
pub use schedule::{CancellationToken, IntervalScheduler, ManualScheduler, Scheduler, Task};
pub use service::{RunId, TickNotifier, TimerService};
