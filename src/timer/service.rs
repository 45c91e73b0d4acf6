/// Countdown service
///
/// Subscribes the [`CountdownTimer`] to the dispatcher, owns its tick
/// schedule and forwards timer notifications to the presentation layer.
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use super::countdown::{CountdownTimer, TimerNotification};
use super::schedule::{CancellationToken, Scheduler};
use crate::messaging::{Dispatcher, DomainEvent, EventKind, SubscriptionHandle};
use crate::overlay::{PresentationMessage, Presenter, WindowShell};
use crate::state::{SettingsStore, TimerState};

/// Identifies one countdown run. Ticks from older runs are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RunId(u64);

/// Called from the scheduler thread on every tick of a run
pub type TickNotifier = Arc<dyn Fn(RunId) + Send + Sync>;

struct ActiveRun {
    id: RunId,
    token: CancellationToken,
}

pub struct TimerService {
    timer: CountdownTimer,
    settings: SettingsStore,
    scheduler: Arc<dyn Scheduler>,
    tick_period: Duration,
    notifier: TickNotifier,
    presenter: Arc<dyn Presenter>,
    window: Arc<Mutex<WindowShell>>,
    active: Option<ActiveRun>,
    last_run: RunId,
}

impl TimerService {
    pub fn new(
        timer: CountdownTimer,
        settings: SettingsStore,
        scheduler: Arc<dyn Scheduler>,
        tick_period: Duration,
        notifier: TickNotifier,
        presenter: Arc<dyn Presenter>,
        window: Arc<Mutex<WindowShell>>,
    ) -> Self {
        Self {
            timer,
            settings,
            scheduler,
            tick_period,
            notifier,
            presenter,
            window,
            active: None,
            last_run: RunId::default(),
        }
    }

    pub fn state(&self) -> TimerState {
        self.timer.state()
    }

    /// Run currently accepting ticks
    pub fn active_run(&self) -> Option<RunId> {
        self.active.as_ref().map(|run| run.id)
    }

    /// Start or restart the countdown
    pub fn start(&mut self, duration_secs: u32) {
        self.stop_schedule();

        let TimerNotification::Started {
            duration_secs,
            restarted,
        } = self.timer.start(duration_secs)
        else {
            return;
        };

        if restarted {
            tracing::info!(duration = duration_secs, "Countdown restarted");
        } else {
            tracing::info!(duration = duration_secs, "Countdown started");
        }

        self.last_run = RunId(self.last_run.0 + 1);
        let run = self.last_run;
        let notifier = Arc::clone(&self.notifier);

        match self
            .scheduler
            .schedule_repeating(self.tick_period, Box::new(move || notifier(run)))
        {
            Ok(token) => self.active = Some(ActiveRun { id: run, token }),
            Err(e) => tracing::error!("Countdown will not advance: {:#}", e),
        }

        self.window.lock().show_overlay();
        self.presenter
            .present(PresentationMessage::StartTimer { duration_secs });
    }

    /// Silence the countdown, discarding remaining time
    pub fn cancel(&mut self) {
        self.stop_schedule();

        match self.timer.cancel() {
            Some(TimerNotification::Cancelled { remaining_secs }) => {
                tracing::info!(remaining = remaining_secs, "Countdown cancelled");
            }
            _ => tracing::debug!("Cancel received while idle"),
        }

        self.presenter.present(PresentationMessage::StopTimer);
    }

    /// Advance the countdown by one second if `run` is still current
    pub fn on_tick(&mut self, run: RunId) {
        let current = match &self.active {
            Some(active) if active.id == run && !active.token.is_cancelled() => active.id,
            _ => {
                tracing::trace!(?run, "Discarding stale tick");
                return;
            }
        };

        for notification in self.timer.tick(self.settings.sound_enabled()) {
            match notification {
                TimerNotification::Tick { remaining_secs } => {
                    tracing::trace!(?current, remaining = remaining_secs, "tick");
                    self.presenter
                        .present(PresentationMessage::TimerTick { remaining_secs });
                }
                TimerNotification::Threshold { remaining_secs } => {
                    tracing::info!(remaining = remaining_secs, "Low time warning");
                    self.presenter.present(PresentationMessage::PlayWarning);
                }
                TimerNotification::Completed => {
                    tracing::info!("Countdown finished");
                    self.stop_schedule();
                    self.presenter.present(PresentationMessage::TimerComplete);
                }
                TimerNotification::HideOverlayRequested => {
                    self.window.lock().hide_overlay();
                }
                TimerNotification::Started { .. } | TimerNotification::Cancelled { .. } => {}
            }
        }
    }

    fn stop_schedule(&mut self) {
        if let Some(run) = self.active.take() {
            run.token.cancel();
        }
    }

    /// Subscribe the service to countdown events
    pub fn attach(
        service: &Arc<Mutex<TimerService>>,
        dispatcher: &Dispatcher,
    ) -> Vec<SubscriptionHandle> {
        let on_start = Arc::clone(service);
        let on_cancel = Arc::clone(service);

        vec![
            dispatcher.subscribe(EventKind::CountdownStart, move |event| {
                if let DomainEvent::CountdownStart { duration_secs } = event {
                    on_start.lock().start(*duration_secs);
                }
                Ok(())
            }),
            dispatcher.subscribe(EventKind::CountdownCancel, move |_| {
                on_cancel.lock().cancel();
                Ok(())
            }),
        ]
    }
}

impl Drop for TimerService {
    fn drop(&mut self) {
        self.stop_schedule();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::ChannelPresenter;
    use crate::state::{SettingsPatch, TimerStatus};
    use crate::timer::schedule::ManualScheduler;
    use crossbeam_channel::{unbounded, Receiver};

    struct Harness {
        service: TimerService,
        scheduler: ManualScheduler,
        ticks: Receiver<RunId>,
        ui: Receiver<PresentationMessage>,
        settings: SettingsStore,
    }

    impl Harness {
        fn new() -> Self {
            let scheduler = ManualScheduler::new();
            let settings = SettingsStore::default();
            let (presenter, ui) = ChannelPresenter::channel();
            let presenter: Arc<dyn Presenter> = Arc::new(presenter);
            let window = Arc::new(Mutex::new(WindowShell::new(
                Arc::clone(&presenter),
                settings.clone(),
            )));
            let (tick_tx, ticks) = unbounded();
            let notifier: TickNotifier = Arc::new(move |run: RunId| {
                let _ = tick_tx.send(run);
            });

            let service = TimerService::new(
                CountdownTimer::default(),
                settings.clone(),
                Arc::new(scheduler.clone()),
                Duration::from_secs(1),
                notifier,
                presenter,
                window,
            );

            Self {
                service,
                scheduler,
                ticks,
                ui,
                settings,
            }
        }

        /// Advance virtual time and deliver the resulting ticks
        fn advance(&mut self, seconds: u32) {
            for _ in 0..seconds {
                self.scheduler.advance(1);
                while let Ok(run) = self.ticks.try_recv() {
                    self.service.on_tick(run);
                }
            }
        }

        fn ui_messages(&self) -> Vec<PresentationMessage> {
            self.ui.try_iter().collect()
        }
    }

    #[test]
    fn test_start_shows_overlay_then_starts_timer() {
        let mut h = Harness::new();
        h.service.start(45);

        assert_eq!(
            h.ui_messages(),
            vec![
                PresentationMessage::ShowOverlay,
                PresentationMessage::StartTimer { duration_secs: 45 }
            ]
        );
        assert_eq!(h.scheduler.active_tasks(), 1);
    }

    #[test]
    fn test_full_run_ticks_warns_and_hides() {
        let mut h = Harness::new();
        h.service.start(12);
        h.ui_messages();

        h.advance(12);
        let messages = h.ui_messages();

        let ticks = messages
            .iter()
            .filter(|m| matches!(m, PresentationMessage::TimerTick { .. }))
            .count();
        assert_eq!(ticks, 12);
        assert!(messages.contains(&PresentationMessage::PlayWarning));
        assert_eq!(
            &messages[messages.len() - 2..],
            &[PresentationMessage::TimerComplete, PresentationMessage::HideOverlay]
        );
        assert_eq!(h.service.state().status, TimerStatus::Idle);
        assert_eq!(h.scheduler.active_tasks(), 0);
    }

    #[test]
    fn test_warning_respects_sound_setting() {
        let mut h = Harness::new();
        h.settings.update(&SettingsPatch::sound(false));
        h.service.start(12);
        h.advance(12);

        assert!(!h.ui_messages().contains(&PresentationMessage::PlayWarning));
    }

    #[test]
    fn test_cancel_discards_queued_tick() {
        let mut h = Harness::new();
        h.service.start(45);
        h.ui_messages();

        // Tick is queued but not yet delivered when the cancel arrives
        h.scheduler.advance(1);
        h.service.cancel();
        while let Ok(run) = h.ticks.try_recv() {
            h.service.on_tick(run);
        }

        assert_eq!(h.ui_messages(), vec![PresentationMessage::StopTimer]);
        assert_eq!(h.service.state().status, TimerStatus::Idle);
        assert_eq!(h.service.state().remaining_secs, 0);
    }

    #[test]
    fn test_restart_ignores_ticks_from_previous_run() {
        let mut h = Harness::new();
        h.service.start(45);
        let first_run = h.service.active_run().unwrap();
        h.advance(5);

        h.service.start(30);
        assert_ne!(h.service.active_run(), Some(first_run));
        h.service.on_tick(first_run);

        assert_eq!(h.service.state().remaining_secs, 30);
        assert_eq!(h.scheduler.active_tasks(), 1);
    }

    #[test]
    fn test_attach_routes_domain_events() {
        let h = Harness::new();
        let ui = h.ui.clone();
        let service = Arc::new(Mutex::new(h.service));
        let dispatcher = Dispatcher::new();
        let handles = TimerService::attach(&service, &dispatcher);
        assert_eq!(handles.len(), 2);

        dispatcher.publish(DomainEvent::CountdownStart { duration_secs: 20 });
        assert_eq!(service.lock().state().remaining_secs, 20);

        dispatcher.publish(DomainEvent::CountdownCancel);
        assert!(service.lock().state().status.is_idle());
        assert_eq!(
            ui.try_iter().last(),
            Some(PresentationMessage::StopTimer)
        );
    }
}
