//! Repeating task scheduling
//!
//! The countdown never sleeps itself. It asks a [`Scheduler`] to run a task
//! once per period and keeps the returned [`CancellationToken`]. Production
//! code uses [`IntervalScheduler`] (one background thread per schedule);
//! tests use [`ManualScheduler`] and advance virtual time explicitly.

use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::AppResult;
use anyhow::Context;

/// Work run on every period
pub type Task = Box<dyn FnMut() + Send>;

/// Stops a scheduled task. Clones share the same cancellation state.
#[derive(Clone, Debug)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    wake: Sender<()>,
}

impl CancellationToken {
    /// Create a token and the receiver that wakes up when it is cancelled
    pub fn pair() -> (Self, Receiver<()>) {
        let (wake, woken) = bounded(1);
        (
            Self {
                cancelled: Arc::new(AtomicBool::new(false)),
                wake,
            },
            woken,
        )
    }

    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            // Nobody listening (manual schedules) is fine
            let _ = self.wake.try_send(());
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Something that can run a task repeatedly until cancelled
pub trait Scheduler: Send + Sync {
    fn schedule_repeating(&self, period: Duration, task: Task) -> AppResult<CancellationToken>;
}

/// Runs each schedule on its own thread, driven by a crossbeam ticker.
///
/// A late tick is delivered once; missed periods are not replayed.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntervalScheduler;

impl Scheduler for IntervalScheduler {
    fn schedule_repeating(&self, period: Duration, mut task: Task) -> AppResult<CancellationToken> {
        let (token, woken) = CancellationToken::pair();
        let thread_token = token.clone();

        thread::Builder::new()
            .name("countdown-ticker".to_string())
            .spawn(move || {
                let ticker = tick(period);
                loop {
                    select! {
                        recv(woken) -> _ => break,
                        recv(ticker) -> _ => {
                            if thread_token.is_cancelled() {
                                break;
                            }
                            task();
                        }
                    }
                }
                tracing::trace!("Ticker thread stopped");
            })
            .context("Failed to spawn countdown ticker thread")?;

        Ok(token)
    }
}

struct ManualTask {
    token: CancellationToken,
    task: Task,
}

/// Virtual-time scheduler: tasks only run when [`ManualScheduler::advance`]
/// is called, one invocation per task per advanced period.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    tasks: Arc<Mutex<Vec<ManualTask>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance virtual time by `periods`, running every live task each period
    pub fn advance(&self, periods: u32) {
        for _ in 0..periods {
            // Run outside the lock so tasks may schedule or cancel
            let mut due = std::mem::take(&mut *self.tasks.lock());
            for entry in due.iter_mut() {
                if !entry.token.is_cancelled() {
                    (entry.task)();
                }
            }

            let mut tasks = self.tasks.lock();
            due.retain(|entry| !entry.token.is_cancelled());
            due.append(&mut tasks);
            *tasks = due;
        }
    }

    /// Number of schedules that are not cancelled
    pub fn active_tasks(&self) -> usize {
        self.tasks
            .lock()
            .iter()
            .filter(|entry| !entry.token.is_cancelled())
            .count()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&self, _period: Duration, task: Task) -> AppResult<CancellationToken> {
        let (token, _woken) = CancellationToken::pair();
        self.tasks.lock().push(ManualTask {
            token: token.clone(),
            task,
        });
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Instant;

    fn counting_task() -> (Arc<AtomicUsize>, Task) {
        let count = Arc::new(AtomicUsize::new(0));
        let task_count = Arc::clone(&count);
        (
            count,
            Box::new(move || {
                task_count.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    #[test]
    fn test_token_cancel_is_shared_between_clones() {
        let (token, woken) = CancellationToken::pair();
        let clone = token.clone();

        clone.cancel();
        assert!(token.is_cancelled());
        assert!(woken.try_recv().is_ok());

        // Second cancel does not block or panic
        token.cancel();
    }

    #[test]
    fn test_manual_scheduler_runs_once_per_period() {
        let scheduler = ManualScheduler::new();
        let (count, task) = counting_task();

        let _token = scheduler
            .schedule_repeating(Duration::from_secs(1), task)
            .unwrap();
        scheduler.advance(3);

        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(scheduler.active_tasks(), 1);
    }

    #[test]
    fn test_manual_scheduler_skips_cancelled_tasks() {
        let scheduler = ManualScheduler::new();
        let (count, task) = counting_task();

        let token = scheduler
            .schedule_repeating(Duration::from_secs(1), task)
            .unwrap();
        scheduler.advance(2);
        token.cancel();
        scheduler.advance(5);

        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.active_tasks(), 0);
    }

    #[test]
    fn test_interval_scheduler_ticks_and_stops() {
        let scheduler = IntervalScheduler;
        let (count, task) = counting_task();

        let token = scheduler
            .schedule_repeating(Duration::from_millis(10), task)
            .unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        while count.load(Ordering::SeqCst) < 3 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(count.load(Ordering::SeqCst) >= 3);

        token.cancel();
        thread::sleep(Duration::from_millis(30));
        let after_cancel = count.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(count.load(Ordering::SeqCst), after_cancel);
    }
}
