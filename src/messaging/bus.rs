/// Event dispatcher for pub/sub messaging
///
/// Maps each [`EventKind`] to an ordered list of callbacks and delivers
/// events synchronously. Delivery is FIFO breadth-first: an event published
/// from inside a callback is queued and delivered once the subscribers of
/// the current event have all run.
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use super::events::{DomainEvent, EventKind};
use crate::error::DispatchError;

/// Callback invoked for every event of the subscribed kind
pub type Callback = Arc<dyn Fn(&DomainEvent) -> anyhow::Result<()> + Send + Sync>;

/// Handle returned by [`Dispatcher::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Event subscriber
struct Subscriber {
    handle: SubscriptionHandle,
    kind: EventKind,
    callback: Callback,
}

struct DispatcherInner {
    subscribers: RwLock<Vec<Subscriber>>,
    next_id: AtomicU64,
    pending: Mutex<VecDeque<DomainEvent>>,
    delivering: AtomicBool,
}

/// Dispatcher for broadcasting domain events to subscribers
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

impl Dispatcher {
    /// Create a new dispatcher
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                subscribers: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(0),
                pending: Mutex::new(VecDeque::new()),
                delivering: AtomicBool::new(false),
            }),
        }
    }

    /// Subscribe to one kind of event. Callbacks run in subscription order.
    pub fn subscribe<F>(&self, kind: EventKind, callback: F) -> SubscriptionHandle
    where
        F: Fn(&DomainEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let handle = SubscriptionHandle(self.inner.next_id.fetch_add(1, Ordering::Relaxed));

        self.inner.subscribers.write().push(Subscriber {
            handle,
            kind,
            callback: Arc::new(callback),
        });

        tracing::debug!(subscription = handle.0, event = %kind, "subscribed");
        handle
    }

    /// Remove a subscription. Unknown or already removed handles are ignored.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.inner.subscribers.write().retain(|s| s.handle != handle);
    }

    /// Publish an event to every current subscriber of its kind.
    ///
    /// Subscriber failures are logged and never reach the publisher.
    pub fn publish(&self, event: DomainEvent) {
        self.inner.pending.lock().push_back(event);

        loop {
            // Someone up the stack (or on another thread) is already draining
            if self.inner.delivering.swap(true, Ordering::AcqRel) {
                return;
            }

            loop {
                let next = self.inner.pending.lock().pop_front();
                let Some(event) = next else { break };
                self.deliver(&event);
            }

            self.inner.delivering.store(false, Ordering::Release);

            if self.inner.pending.lock().is_empty() {
                return;
            }
        }
    }

    fn deliver(&self, event: &DomainEvent) {
        let kind = event.kind();

        // Snapshot so callbacks may subscribe/unsubscribe without deadlocking
        let targets: Vec<(SubscriptionHandle, Callback)> = self
            .inner
            .subscribers
            .read()
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| (s.handle, Arc::clone(&s.callback)))
            .collect();

        if targets.is_empty() {
            tracing::trace!(event = %kind, "no subscribers");
            return;
        }

        for (handle, callback) in targets {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| callback(event)));

            let failure = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(source)) => DispatchError::SubscriberFailure {
                    event: kind,
                    subscription: handle.0,
                    source: source.into(),
                },
                Err(payload) => DispatchError::SubscriberPanicked {
                    event: kind,
                    subscription: handle.0,
                    message: panic_message(payload.as_ref()),
                },
            };

            match std::error::Error::source(&failure) {
                Some(cause) => tracing::error!(error = %failure, %cause, "subscriber failed"),
                None => tracing::error!(error = %failure, "subscriber failed"),
            }
        }
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }

    /// Get number of active subscribers for one kind
    pub fn subscriber_count_for(&self, kind: EventKind) -> usize {
        self.inner
            .subscribers
            .read()
            .iter()
            .filter(|s| s.kind == kind)
            .count()
    }

    /// Clear all subscribers
    pub fn clear(&self) {
        self.inner.subscribers.write().clear();
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Dispatcher {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> Callback) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_for_factory = Arc::clone(&log);
        let factory = move |tag: &str| -> Callback {
            let log = Arc::clone(&log_for_factory);
            let tag = tag.to_string();
            Arc::new(move |event: &DomainEvent| -> anyhow::Result<()> {
                log.lock().push(format!("{}:{}", tag, event.kind()));
                Ok(())
            })
        };
        (log, factory)
    }

    #[test]
    fn test_dispatcher_subscribe() {
        let bus = Dispatcher::new();
        let _handle = bus.subscribe(EventKind::GameStarted, |_| Ok(()));
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(bus.subscriber_count_for(EventKind::GameStarted), 1);
        assert_eq!(bus.subscriber_count_for(EventKind::GameStopped), 0);
    }

    #[test]
    fn test_dispatcher_unsubscribe_is_idempotent() {
        let bus = Dispatcher::new();
        let handle = bus.subscribe(EventKind::GameStarted, |_| Ok(()));
        assert_eq!(bus.subscriber_count(), 1);

        bus.unsubscribe(handle);
        assert_eq!(bus.subscriber_count(), 0);

        bus.unsubscribe(handle);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let bus = Dispatcher::new();
        let (log, factory) = recorder();
        let cb = factory("a");
        bus.subscribe(EventKind::GameStarted, move |e| cb(e));

        bus.publish(DomainEvent::CountdownCancel);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_delivery_in_subscription_order() {
        let bus = Dispatcher::new();
        let (log, factory) = recorder();
        for tag in ["first", "second", "third"] {
            let cb = factory(tag);
            bus.subscribe(EventKind::CountdownStart, move |e| cb(e));
        }

        bus.publish(DomainEvent::CountdownStart { duration_secs: 45 });

        assert_eq!(
            *log.lock(),
            vec![
                "first:countdown-start",
                "second:countdown-start",
                "third:countdown-start"
            ]
        );
    }

    #[test]
    fn test_failing_subscriber_does_not_block_others() {
        let bus = Dispatcher::new();
        let (log, factory) = recorder();

        bus.subscribe(EventKind::CountdownCancel, |_| {
            Err(anyhow::anyhow!("subscriber exploded"))
        });
        let healthy = factory("healthy");
        bus.subscribe(EventKind::CountdownCancel, move |e| healthy(e));

        bus.publish(DomainEvent::CountdownCancel);

        assert_eq!(*log.lock(), vec!["healthy:countdown-cancel"]);
    }

    #[test]
    fn test_panicking_subscriber_is_isolated() {
        let bus = Dispatcher::new();
        let (log, factory) = recorder();

        bus.subscribe(EventKind::GameStopped, |_| panic!("boom"));
        let healthy = factory("healthy");
        bus.subscribe(EventKind::GameStopped, move |e| healthy(e));

        bus.publish(DomainEvent::GameStopped);
        // Dispatcher must still be usable afterwards
        bus.publish(DomainEvent::GameStopped);

        assert_eq!(log.lock().len(), 2);
    }

    #[test]
    fn test_reentrant_publish_is_breadth_first() {
        let bus = Dispatcher::new();
        let (log, factory) = recorder();

        let inner_bus = bus.clone();
        let first = factory("first");
        bus.subscribe(EventKind::CountdownStart, move |e| {
            first(e)?;
            inner_bus.publish(DomainEvent::CountdownCancel);
            Ok(())
        });
        let second = factory("second");
        bus.subscribe(EventKind::CountdownStart, move |e| second(e));
        let cancel = factory("cancel");
        bus.subscribe(EventKind::CountdownCancel, move |e| cancel(e));

        bus.publish(DomainEvent::CountdownStart { duration_secs: 10 });

        assert_eq!(
            *log.lock(),
            vec![
                "first:countdown-start",
                "second:countdown-start",
                "cancel:countdown-cancel"
            ]
        );
    }

    #[test]
    fn test_subscribe_from_callback_does_not_deadlock() {
        let bus = Dispatcher::new();
        let inner_bus = bus.clone();
        bus.subscribe(EventKind::GameStarted, move |_| {
            inner_bus.subscribe(EventKind::GameStopped, |_| Ok(()));
            Ok(())
        });

        bus.publish(DomainEvent::GameStarted);
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[test]
    fn test_dispatcher_clear() {
        let bus = Dispatcher::new();
        bus.subscribe(EventKind::GameStarted, |_| Ok(()));
        bus.subscribe(EventKind::GameStopped, |_| Ok(()));

        assert_eq!(bus.subscriber_count(), 2);

        bus.clear();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_dispatcher_clone() {
        let bus1 = Dispatcher::new();
        let bus2 = bus1.clone();

        bus1.subscribe(EventKind::GameStarted, |_| Ok(()));
        assert_eq!(bus1.subscriber_count(), 1);
        assert_eq!(bus2.subscriber_count(), 1); // Shared state
    }
}
