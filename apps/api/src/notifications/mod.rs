//! Toast notification bus.
//!
//! One `ToastBus` is created by `main` and cloned into `AppState`; every clone
//! shares the same list and subscriber set. Subscribers receive the full list
//! of active toasts after every change.

pub mod handlers;

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tracing::debug;
use uuid::Uuid;

use crate::models::toast::{NewToast, Toast};

type Callback = Arc<dyn Fn(&[Toast]) + Send + Sync>;

#[derive(Default)]
struct Inner {
    toasts: Vec<Toast>,
    subscribers: Vec<(u64, Callback)>,
    next_subscriber_id: u64,
}

#[derive(Clone, Default)]
pub struct ToastBus {
    inner: Arc<Mutex<Inner>>,
}

/// Keeps a callback registered. Dropping it (or calling `unsubscribe`)
/// removes the callback from the bus.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    bus: Weak<Mutex<Inner>>,
}

impl Subscription {
    /// Same as dropping the handle.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.bus.upgrade() {
            lock(&inner).subscribers.retain(|(id, _)| *id != self.id);
        }
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ToastBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&[Toast]) + Send + Sync + 'static,
    {
        let mut inner = lock(&self.inner);
        let id = inner.next_subscriber_id;
        inner.next_subscriber_id += 1;
        inner.subscribers.push((id, Arc::new(callback)));
        Subscription {
            id,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Adds a toast and notifies subscribers. When called inside a tokio
    /// runtime, the toast also dismisses itself once its duration elapses.
    pub fn publish(&self, new: NewToast) -> Uuid {
        let duration = Duration::from_millis(new.effective_duration_ms());
        let toast = Toast {
            id: Uuid::new_v4(),
            kind: new.kind,
            title: new.title,
            message: new.message,
            duration_ms: new.duration_ms,
        };
        let id = toast.id;
        debug!("Toast {:?}: {}", toast.kind, toast.title);

        let snapshot = {
            let mut inner = lock(&self.inner);
            inner.toasts.push(toast);
            Self::snapshot(&inner)
        };
        Self::notify(snapshot);

        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            let weak = Arc::downgrade(&self.inner);
            runtime.spawn(async move {
                tokio::time::sleep(duration).await;
                if let Some(inner) = weak.upgrade() {
                    ToastBus { inner }.dismiss(id);
                }
            });
        }

        id
    }

    /// Removes a toast by id. Returns false (and notifies nobody) if it was
    /// already gone.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let snapshot = {
            let mut inner = lock(&self.inner);
            let before = inner.toasts.len();
            inner.toasts.retain(|t| t.id != id);
            if inner.toasts.len() == before {
                return false;
            }
            Self::snapshot(&inner)
        };
        Self::notify(snapshot);
        true
    }

    pub fn active(&self) -> Vec<Toast> {
        lock(&self.inner).toasts.clone()
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        lock(&self.inner).subscribers.len()
    }

    fn snapshot(inner: &Inner) -> (Vec<Toast>, Vec<Callback>) {
        let callbacks = inner.subscribers.iter().map(|(_, cb)| cb.clone()).collect();
        (inner.toasts.clone(), callbacks)
    }

    /// Runs callbacks with the lock released so they may call back into the bus.
    fn notify((toasts, callbacks): (Vec<Toast>, Vec<Callback>)) {
        for callback in callbacks {
            callback(&toasts);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::toast::ToastKind;

    fn recorder(bus: &ToastBus) -> (Subscription, Arc<Mutex<Vec<Vec<Uuid>>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let sub = bus.subscribe(move |toasts| {
            sink.lock()
                .unwrap()
                .push(toasts.iter().map(|t| t.id).collect());
        });
        (sub, seen)
    }

    #[test]
    fn test_publish_assigns_unique_ids_and_notifies() {
        let bus = ToastBus::new();
        let (_sub, seen) = recorder(&bus);

        let a = bus.publish(NewToast::success("Saved"));
        let b = bus.publish(NewToast::info("Heads up").with_message("details"));
        assert_ne!(a, b);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], vec![a, b]);

        let active = bus.active();
        assert_eq!(active[1].kind, ToastKind::Info);
        assert_eq!(active[1].message.as_deref(), Some("details"));
    }

    #[test]
    fn test_dismiss_middle_keeps_order_and_ids() {
        let bus = ToastBus::new();
        let first = bus.publish(NewToast::success("one"));
        let second = bus.publish(NewToast::warning("two"));
        let third = bus.publish(NewToast::error("three"));

        assert!(bus.dismiss(second));

        let ids: Vec<Uuid> = bus.active().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![first, third]);
    }

    #[test]
    fn test_dismiss_unknown_id_does_not_notify() {
        let bus = ToastBus::new();
        bus.publish(NewToast::info("hello"));
        let (_sub, seen) = recorder(&bus);

        assert!(!bus.dismiss(Uuid::new_v4()));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unsubscribe_removes_callback() {
        let bus = ToastBus::new();
        let (sub, seen) = recorder(&bus);
        assert_eq!(bus.subscriber_count(), 1);

        sub.unsubscribe();
        assert_eq!(bus.subscriber_count(), 0);

        bus.publish(NewToast::info("nobody listening"));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dropped_subscription_unsubscribes() {
        let bus = ToastBus::new();
        {
            let (_sub, _seen) = recorder(&bus);
            assert_eq!(bus.subscriber_count(), 1);
        }
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_callback_may_reenter_bus() {
        let bus = ToastBus::new();
        let inner_bus = bus.clone();
        let counts = Arc::new(Mutex::new(Vec::new()));
        let sink = counts.clone();
        let _sub = bus.subscribe(move |_| {
            sink.lock().unwrap().push(inner_bus.active().len());
        });

        bus.publish(NewToast::info("reentrant"));
        assert_eq!(*counts.lock().unwrap(), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_expires_after_default_duration() {
        let bus = ToastBus::new();
        bus.publish(NewToast::success("bye soon"));

        tokio::time::sleep(Duration::from_millis(4_999)).await;
        assert_eq!(bus.active().len(), 1);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(bus.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_duration_and_early_dismissal() {
        let bus = ToastBus::new();
        let short = bus.publish(NewToast::info("short").with_duration_ms(100));
        let manual = bus.publish(NewToast::info("manual"));

        assert!(bus.dismiss(manual));
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(bus.active().iter().all(|t| t.id != short));
        assert!(bus.active().is_empty());
    }
}
