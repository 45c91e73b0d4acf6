/// Presentation side of the overlay
///
/// ## Architecture
///
/// ```text
/// TimerService ──┐
///                ├──> Presenter ──> overlay window / settings panel
/// WindowShell ───┘        ├── ChannelPresenter   (in-process UI, tests)
///                         ├── JsonLinesPresenter (out-of-process shell)
///                         └── ConsolePresenter   (terminal)
/// ```

pub mod console;
pub mod display;
pub mod presenter;
pub mod window;

// Re-export commonly used types
pub use console::ConsolePresenter;
pub use display::{format_seconds, TimerDisplay, Urgency};
pub use presenter::{ChannelPresenter, JsonLinesPresenter, PresentationMessage, Presenter};
pub use window::WindowShell;
