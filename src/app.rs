//! Application loop
//!
//! Owns every component and mutates them from a single thread. Background
//! threads (event source, hotkeys, tick scheduler, Ctrl+C) only post
//! [`AppMessage`]s.

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::messaging::{Command, CommandExecutor, CommandResult, Dispatcher, SubscriptionHandle};
use crate::overlay::{Presenter, WindowShell};
use crate::platform::{EventSourceAdapter, PlatformMessage};
use crate::state::{Settings, SettingsStore, TimerState};
use crate::timer::{CountdownTimer, RunId, Scheduler, TickNotifier, TimerService};

/// Everything the app loop reacts to
#[derive(Debug, Clone)]
pub enum AppMessage {
    /// Decoded platform feed message
    Platform(PlatformMessage),

    /// Presentation layer, hotkey or demo console request
    Command(Command),

    /// One scheduled countdown tick
    Tick(RunId),

    /// An event source reached its end
    SourceClosed(&'static str),

    Shutdown,
}

pub struct App {
    dispatcher: Dispatcher,
    settings: SettingsStore,
    window: Arc<Mutex<WindowShell>>,
    timer: Arc<Mutex<TimerService>>,
    adapter: EventSourceAdapter,
    executor: CommandExecutor,
    subscriptions: Vec<SubscriptionHandle>,
    tx: Sender<AppMessage>,
    rx: Receiver<AppMessage>,
    running: bool,
    source_closed: bool,
}

impl App {
    pub fn new(
        config: &AppConfig,
        presenter: Arc<dyn Presenter>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        let (tx, rx) = unbounded();
        let dispatcher = Dispatcher::new();
        let settings = SettingsStore::new(config.settings);

        let window = Arc::new(Mutex::new(WindowShell::new(
            Arc::clone(&presenter),
            settings.clone(),
        )));

        let tick_tx = tx.clone();
        let notifier: TickNotifier = Arc::new(move |run: RunId| {
            // Loop already gone during shutdown
            let _ = tick_tx.send(AppMessage::Tick(run));
        });

        let timer = Arc::new(Mutex::new(TimerService::new(
            CountdownTimer::new(config.warning_threshold_secs),
            settings.clone(),
            scheduler,
            config.tick_interval(),
            notifier,
            presenter,
            Arc::clone(&window),
        )));

        let mut subscriptions = TimerService::attach(&timer, &dispatcher);
        subscriptions.extend(WindowShell::attach(&window, &dispatcher));

        let adapter =
            EventSourceAdapter::new(dispatcher.clone(), settings.clone(), config.target_game_id);
        let executor =
            CommandExecutor::new(dispatcher.clone(), settings.clone(), Arc::clone(&window));

        tracing::info!(
            subscribers = dispatcher.subscriber_count(),
            target_game = config.target_game_id,
            "Spike timer ready"
        );

        Self {
            dispatcher,
            settings,
            window,
            timer,
            adapter,
            executor,
            subscriptions,
            tx,
            rx,
            running: true,
            source_closed: false,
        }
    }

    /// Sender for background producers
    pub fn sender(&self) -> Sender<AppMessage> {
        self.tx.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer.lock().state()
    }

    pub fn settings(&self) -> Settings {
        self.settings.get()
    }

    pub fn overlay_visible(&self) -> bool {
        self.window.lock().overlay_visible()
    }

    pub fn settings_visible(&self) -> bool {
        self.window.lock().settings_visible()
    }

    /// Run a command from the presentation layer
    pub fn execute(&mut self, command: Command) -> CommandResult {
        let quit = command == Command::Quit;
        let result = self.executor.execute_sync(command);
        if quit {
            self.running = false;
        }
        result
    }

    /// Handle one message on the loop thread
    pub fn handle(&mut self, message: AppMessage) {
        match message {
            AppMessage::Platform(message) => self.adapter.handle_message(&message),
            AppMessage::Command(command) => {
                if let CommandResult::Settings(settings) = self.execute(command) {
                    tracing::debug!(?settings, "Command returned settings");
                }
            }
            AppMessage::Tick(run) => self.timer.lock().on_tick(run),
            AppMessage::SourceClosed(source) => {
                tracing::info!("Event source '{}' closed", source);
                self.source_closed = true;
            }
            AppMessage::Shutdown => {
                tracing::info!("Shutdown requested");
                self.running = false;
            }
        }

        // Nothing left to drive the overlay once the source is gone
        if self.source_closed && self.timer_state().status.is_idle() {
            tracing::info!("Event source finished and countdown idle, stopping");
            self.running = false;
        }
    }

    /// Handle every message already queued, without blocking.
    ///
    /// Returns the number of messages handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while self.running {
            let Ok(message) = self.rx.try_recv() else {
                break;
            };
            self.handle(message);
            handled += 1;
        }
        handled
    }

    /// Block on the message queue until shutdown
    pub fn run(&mut self) {
        tracing::info!("Entering main loop");
        while self.running {
            match self.rx.recv() {
                Ok(message) => self.handle(message),
                // Unreachable while `self.tx` is alive
                Err(_) => break,
            }
        }
        tracing::info!("Main loop finished");
    }
}

impl Drop for App {
    fn drop(&mut self) {
        for handle in self.subscriptions.drain(..) {
            self.dispatcher.unsubscribe(handle);
        }
    }
}
