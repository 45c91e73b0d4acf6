/// Messaging module for Event/Command architecture
///
/// This module implements the Event/Command segregation pattern:
/// - **Events**: Normalized game events (past tense, broadcast by the dispatcher)
/// - **Commands**: Requests from the presentation layer and hotkeys (imperative)
///
/// ## Architecture
///
/// ```text
/// ┌──────────┐  DomainEvent  ┌────────────┐           ┌──────────────┐
/// │ Platform │ ────────────> │ Dispatcher │ ────────> │ TimerService │
/// │ adapter  │               │            │ ────────> │ WindowShell  │
/// └──────────┘               └────────────┘           └──────────────┘
///                                  ^
/// ┌──────────┐   Command     ┌──────────┐
/// │ UI/keys  │ ────────────> │ Executor │  (simulate start/cancel)
/// └──────────┘               └──────────┘
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// let dispatcher = Dispatcher::new();
///
/// let handle = dispatcher.subscribe(EventKind::CountdownStart, |event| {
///     tracing::info!("{}", event.description());
///     Ok(())
/// });
///
/// dispatcher.publish(DomainEvent::CountdownStart { duration_secs: 45 });
/// dispatcher.unsubscribe(handle);
/// ```

pub mod bus;
pub mod commands;
pub mod events;
pub mod executor;

// Re-export commonly used types
pub use bus::{Callback, Dispatcher, SubscriptionHandle};
pub use commands::{Command, CommandResult};
pub use events::{DomainEvent, EventKind};
pub use executor::CommandExecutor;
