//! Global hotkey system for the spike timer
//!
//! Provides system-wide keyboard shortcuts that work while the game has focus.
//! Each shortcut maps onto a [`Command`], never onto the countdown itself.
//!
//! The manager only delivers events while the thread that created it runs
//! the platform event loop. [`spawn`] picks the right thread per platform.

use crossbeam_channel::Sender;
use global_hotkey::{hotkey::HotKey, GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use std::thread;

use crate::app::AppMessage;
use crate::config::HotkeyConfig;
use crate::error::HotkeyError;
use crate::messaging::Command;

/// User-invocable global actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    ToggleOverlay,
    ToggleSettings,
}

impl GlobalAction {
    pub fn command(self) -> Command {
        match self {
            GlobalAction::ToggleOverlay => Command::ToggleOverlay,
            GlobalAction::ToggleSettings => Command::ToggleSettings,
        }
    }
}

/// Parse a binding such as `CmdOrCtrl+Shift+O`
pub fn parse_binding(binding: &str) -> Result<HotKey, HotkeyError> {
    binding
        .parse::<HotKey>()
        .map_err(|e| HotkeyError::InvalidBinding(format!("{} ({})", binding, e)))
}

/// Manages system-wide keyboard shortcuts
pub struct GlobalHotkeySystem {
    manager: GlobalHotKeyManager,
    hotkeys: Vec<(HotKey, GlobalAction)>,
}

impl GlobalHotkeySystem {
    /// Register the two global actions
    pub fn new(config: &HotkeyConfig) -> Result<Self, HotkeyError> {
        // Parse first so a typo does not leave half the bindings registered
        let bindings = [
            (
                parse_binding(&config.toggle_overlay)?,
                GlobalAction::ToggleOverlay,
                &config.toggle_overlay,
            ),
            (
                parse_binding(&config.toggle_settings)?,
                GlobalAction::ToggleSettings,
                &config.toggle_settings,
            ),
        ];

        let manager = GlobalHotKeyManager::new().map_err(HotkeyError::ManagerUnavailable)?;
        let mut system = Self {
            manager,
            hotkeys: Vec::new(),
        };

        for (hotkey, action, binding) in bindings {
            system
                .manager
                .register(hotkey)
                .map_err(|source| HotkeyError::RegisterFailed {
                    binding: binding.clone(),
                    source,
                })?;
            system.hotkeys.push((hotkey, action));
            tracing::info!("✓ Global hotkey registered: {} - {:?}", binding, action);
        }

        Ok(system)
    }

    /// Start listening for hotkey events in a background thread.
    ///
    /// The hotkeys stay registered for as long as `self` lives. The listener
    /// stops once the app loop is gone.
    pub fn start_listener(&self, tx: Sender<AppMessage>) -> Result<(), HotkeyError> {
        let receiver = GlobalHotKeyEvent::receiver();
        let hotkeys = self.hotkeys.clone();

        thread::Builder::new()
            .name("global-hotkeys".to_string())
            .spawn(move || {
                while let Ok(event) = receiver.recv() {
                    let Some(action) = action_for(&hotkeys, &event) else {
                        continue;
                    };
                    tracing::debug!("Global hotkey triggered: {:?}", action);
                    if tx.send(AppMessage::Command(action.command())).is_err() {
                        break;
                    }
                }
            })
            .map_err(HotkeyError::ListenerFailed)?;

        tracing::info!("✓ Global hotkey listener started");
        Ok(())
    }
}

/// Where hotkey events come from on this platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLoop {
    /// The manager runs its own background listener (X11)
    Background,
    /// A dedicated thread owns the manager and pumps window messages
    MessagePump,
    /// Needs the main-thread run loop, which the console shell never runs
    MainThreadOnly,
}

impl EventLoop {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            EventLoop::MessagePump
        } else if cfg!(target_os = "macos") {
            EventLoop::MainThreadOnly
        } else {
            EventLoop::Background
        }
    }
}

/// Keeps the global hotkeys registered until dropped
pub struct HotkeyHandle {
    #[cfg(target_os = "windows")]
    pump: Option<(u32, thread::JoinHandle<()>)>,
    #[cfg(not(target_os = "windows"))]
    _system: GlobalHotkeySystem,
}

/// Register the global actions and forward their presses to the app loop
pub fn spawn(config: &HotkeyConfig, tx: Sender<AppMessage>) -> Result<HotkeyHandle, HotkeyError> {
    match EventLoop::current() {
        EventLoop::MainThreadOnly => Err(HotkeyError::Unsupported(
            "the console shell does not run the main-thread event loop",
        )),
        EventLoop::MessagePump | EventLoop::Background => start(config, tx),
    }
}

#[cfg(not(target_os = "windows"))]
fn start(config: &HotkeyConfig, tx: Sender<AppMessage>) -> Result<HotkeyHandle, HotkeyError> {
    let system = GlobalHotkeySystem::new(config)?;
    system.start_listener(tx)?;
    Ok(HotkeyHandle { _system: system })
}

/// The manager's hidden window belongs to the thread that creates it, so
/// registration and the message pump share one thread.
#[cfg(target_os = "windows")]
fn start(config: &HotkeyConfig, tx: Sender<AppMessage>) -> Result<HotkeyHandle, HotkeyError> {
    let (ready_tx, ready_rx) = crossbeam_channel::bounded(1);
    let config = config.clone();

    let pump = thread::Builder::new()
        .name("hotkey-pump".to_string())
        .spawn(move || {
            let system = match GlobalHotkeySystem::new(&config) {
                Ok(system) => system,
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };
            if let Err(e) = system.start_listener(tx) {
                let _ = ready_tx.send(Err(e));
                return;
            }

            let _ = ready_tx.send(Ok(message_loop::current_thread_id()));
            message_loop::run();
            drop(system);
        })
        .map_err(HotkeyError::ListenerFailed)?;

    let thread_id = match ready_rx.recv() {
        Ok(ready) => ready?,
        Err(_) => {
            return Err(HotkeyError::ListenerFailed(std::io::Error::new(
                std::io::ErrorKind::Other,
                "hotkey thread exited before registering",
            )))
        }
    };

    tracing::info!("✓ Hotkey message pump started");
    Ok(HotkeyHandle {
        pump: Some((thread_id, pump)),
    })
}

#[cfg(target_os = "windows")]
impl Drop for HotkeyHandle {
    fn drop(&mut self) {
        if let Some((thread_id, pump)) = self.pump.take() {
            message_loop::quit(thread_id);
            if pump.join().is_err() {
                tracing::error!("Hotkey message pump panicked");
            }
        }
    }
}

#[cfg(target_os = "windows")]
mod message_loop {
    use std::ptr;
    use winapi::um::processthreadsapi::GetCurrentThreadId;
    use winapi::um::winuser::{
        DispatchMessageW, GetMessageW, PostThreadMessageW, TranslateMessage, MSG, WM_QUIT,
    };

    pub fn current_thread_id() -> u32 {
        unsafe { GetCurrentThreadId() }
    }

    /// Dispatch window messages until `WM_QUIT`
    pub fn run() {
        unsafe {
            let mut msg: MSG = std::mem::zeroed();
            while GetMessageW(&mut msg, ptr::null_mut(), 0, 0) > 0 {
                TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
    }

    pub fn quit(thread_id: u32) {
        let posted = unsafe { PostThreadMessageW(thread_id, WM_QUIT, 0, 0) };
        if posted == 0 {
            tracing::warn!("Could not stop hotkey message pump");
        }
    }
}

/// Map a hotkey event to its action. Only key presses count.
fn action_for(
    hotkeys: &[(HotKey, GlobalAction)],
    event: &GlobalHotKeyEvent,
) -> Option<GlobalAction> {
    if event.state() != HotKeyState::Pressed {
        return None;
    }

    let action = hotkeys
        .iter()
        .find(|(hotkey, _)| hotkey.id() == event.id())
        .map(|(_, action)| *action);

    if action.is_none() {
        tracing::warn!("Unknown global hotkey event: {:?}", event.id());
    }
    action
}

impl Drop for GlobalHotkeySystem {
    fn drop(&mut self) {
        for (hotkey, _) in &self.hotkeys {
            if let Err(e) = self.manager.unregister(*hotkey) {
                tracing::error!("Failed to unregister hotkey: {}", e);
            }
        }
        tracing::info!("Global hotkeys unregistered");
    }
}
