// Listener registry: per event kind, an ordered list of callbacks
use super::events::{EventKind, ObserverEvent};
use crate::error::{ObserverError, ObserverResult};
use crate::template_matching::Location;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, PoisonError, RwLock};

/// Callback invoked with the event's location.
///
/// Identity is the `Arc` allocation: keep a clone of the handle to unregister it later.
pub type Listener = Arc<dyn Fn(Location) + Send + Sync>;

/// Wrap a closure into a listener handle
pub fn listener<F>(f: F) -> Listener
where
    F: Fn(Location) + Send + Sync + 'static,
{
    Arc::new(f)
}

pub struct ListenerRegistry {
    slots: RwLock<HashMap<EventKind, Vec<Listener>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        let slots = EventKind::ALL
            .iter()
            .map(|kind| (*kind, Vec::new()))
            .collect();
        Self {
            slots: RwLock::new(slots),
        }
    }

    /// Append a listener; the same handle may be registered several times
    pub fn register(&self, listener: Listener, kind: EventKind) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        slots.entry(kind).or_default().push(listener);
    }

    /// Remove the earliest registration of `listener` for `kind`
    pub fn unregister(&self, listener: &Listener, kind: EventKind) -> ObserverResult<()> {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let registered = slots.entry(kind).or_default();

        let position = registered
            .iter()
            .position(|l| Arc::ptr_eq(l, listener))
            .ok_or(ObserverError::NotRegistered { kind })?;
        registered.remove(position);
        Ok(())
    }

    /// Number of registrations for `kind`
    pub fn count(&self, kind: EventKind) -> usize {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.get(&kind).map_or(0, Vec::len)
    }

    /// Copy of the listeners for `kind`, in call order
    fn snapshot(&self, kind: EventKind) -> Vec<Listener> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.get(&kind).cloned().unwrap_or_default()
    }

    /// Call every listener registered for the event's kind, in registration order.
    ///
    /// Listeners run on a snapshot taken before the first call, outside the lock, so
    /// they may register or unregister themselves. A panicking listener is logged and
    /// skipped; the rest still run. Returns the number of listeners that panicked.
    pub fn dispatch(&self, event: &ObserverEvent) -> usize {
        let location = event.location();
        let mut failed = 0;

        for (i, listener) in self.snapshot(event.kind()).iter().enumerate() {
            if catch_unwind(AssertUnwindSafe(|| listener(location))).is_err() {
                log::error!("❌ Listener #{} for '{}' panicked; continuing dispatch", i, event);
                failed += 1;
            }
        }

        failed
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> Listener {
        let log = log.clone();
        listener(move |loc| log.lock().unwrap().push(format!("{tag}{loc}")))
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let registry = ListenerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        registry.register(recorder(&log, "a"), EventKind::Found);
        registry.register(recorder(&log, "b"), EventKind::Found);
        registry.register(recorder(&log, "lost"), EventKind::Lost);

        registry.dispatch(&ObserverEvent::Found(Location::new(1, 2)));

        assert_eq!(*log.lock().unwrap(), vec!["a(1, 2)", "b(1, 2)"]);
    }

    #[test]
    fn test_duplicate_registration_fires_twice() {
        let registry = ListenerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let l = recorder(&log, "x");
        registry.register(l.clone(), EventKind::Moved);
        registry.register(l.clone(), EventKind::Moved);

        registry.dispatch(&ObserverEvent::Moved(Location::new(0, 0)));
        assert_eq!(log.lock().unwrap().len(), 2);

        registry.unregister(&l, EventKind::Moved).unwrap();
        assert_eq!(registry.count(EventKind::Moved), 1);
    }

    #[test]
    fn test_register_unregister_restores_order() {
        let registry = ListenerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = recorder(&log, "a");
        let b = recorder(&log, "b");
        let extra = recorder(&log, "extra");
        registry.register(a.clone(), EventKind::Found);
        registry.register(b.clone(), EventKind::Found);

        registry.register(extra.clone(), EventKind::Found);
        registry.unregister(&extra, EventKind::Found).unwrap();
        registry.dispatch(&ObserverEvent::Found(Location::new(5, 5)));

        assert_eq!(*log.lock().unwrap(), vec!["a(5, 5)", "b(5, 5)"]);
    }

    #[test]
    fn test_unregister_removes_earliest_occurrence() {
        let registry = ListenerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = recorder(&log, "a");
        let b = recorder(&log, "b");
        registry.register(a.clone(), EventKind::Found);
        registry.register(b.clone(), EventKind::Found);
        registry.register(a.clone(), EventKind::Found);

        registry.unregister(&a, EventKind::Found).unwrap();
        registry.dispatch(&ObserverEvent::Found(Location::new(0, 1)));

        assert_eq!(*log.lock().unwrap(), vec!["b(0, 1)", "a(0, 1)"]);
    }

    #[test]
    fn test_unregister_unknown_listener_fails() {
        let registry = ListenerRegistry::new();
        let l = listener(|_| {});

        let err = registry.unregister(&l, EventKind::Lost).unwrap_err();
        assert!(matches!(err, ObserverError::NotRegistered { kind: EventKind::Lost }));

        // Registered for another kind only
        registry.register(l.clone(), EventKind::Found);
        assert!(registry.unregister(&l, EventKind::Moved).is_err());
    }

    #[test]
    fn test_equal_closures_are_distinct_listeners() {
        let registry = ListenerRegistry::new();
        registry.register(listener(|_| {}), EventKind::Found);

        let lookalike = listener(|_| {});
        assert!(registry.unregister(&lookalike, EventKind::Found).is_err());
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let registry = ListenerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        registry.register(listener(|_| panic!("listener failure")), EventKind::Lost);
        registry.register(recorder(&log, "after"), EventKind::Lost);

        let failed = registry.dispatch(&ObserverEvent::Lost(Location::new(3, 4)));

        assert_eq!(failed, 1);
        assert_eq!(*log.lock().unwrap(), vec!["after(3, 4)"]);
    }

    #[test]
    fn test_listener_may_unregister_itself_during_dispatch() {
        let registry = Arc::new(ListenerRegistry::new());
        let calls = Arc::new(Mutex::new(0));

        let slot: Arc<Mutex<Option<Listener>>> = Arc::new(Mutex::new(None));
        let me = {
            let registry = registry.clone();
            let slot = slot.clone();
            let calls = calls.clone();
            listener(move |_| {
                *calls.lock().unwrap() += 1;
                if let Some(me) = slot.lock().unwrap().take() {
                    registry.unregister(&me, EventKind::Found).unwrap();
                }
            })
        };
        *slot.lock().unwrap() = Some(me.clone());
        registry.register(me, EventKind::Found);

        registry.dispatch(&ObserverEvent::Found(Location::new(0, 0)));
        registry.dispatch(&ObserverEvent::Found(Location::new(0, 0)));

        assert_eq!(*calls.lock().unwrap(), 1);
        assert_eq!(registry.count(EventKind::Found), 0);
    }
}
