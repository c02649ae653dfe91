//! Publish/subscribe hub with ordered, synchronous fan-out.

use super::listener::{same_listener, CallbackResult, Lifecycle, ListenerHandle};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Registry of listeners that are all invoked, in registration order,
/// whenever a payload is broadcast.
///
/// The hub owns the registration, not the listeners: handles are shared
/// with whoever created them. Listeners are de-duplicated by handle
/// identity.
///
/// Broadcasting is synchronous and single-threaded. A failing listener
/// aborts the broadcast: listeners after it are not called and the error is
/// returned to the caller of [`notify`](ObserverHub::notify).
///
/// Listeners may add or remove registrations while a broadcast is running.
/// The running broadcast keeps visiting the listeners registered when it
/// started; changes take effect from the next broadcast.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use tilelock::observer::{listener, ObserverHub};
///
/// let hub: ObserverHub<(u32, u32)> = ObserverHub::new();
/// let total = Rc::new(Cell::new(0));
/// let sink = Rc::clone(&total);
/// let sum = listener(move |(a, b): &(u32, u32)| {
///     sink.set(sink.get() + a + b);
///     Ok(())
/// });
///
/// hub.add_listener(&sum);
/// hub.add_listener(&sum);
/// hub.notify(&(2, 3)).unwrap();
///
/// assert_eq!(total.get(), 5);
/// ```
pub struct ObserverHub<A> {
    listeners: RefCell<Vec<ListenerHandle<A>>>,
}

impl<A> ObserverHub<A> {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Register a listener. Returns `false` if it was already registered.
    ///
    /// The listener's `Added` hook runs only when it is newly registered.
    pub fn add_listener(&self, listener: &ListenerHandle<A>) -> bool {
        {
            let mut listeners = self.listeners.borrow_mut();
            if listeners.iter().any(|l| same_listener(l, listener)) {
                return false;
            }
            listeners.push(Rc::clone(listener));
        }
        tracing::trace!(listeners = self.len(), "listener added");
        listener.lifecycle(Lifecycle::Added);
        true
    }

    /// Unregister a listener. Returns `false`, and does nothing else, if it
    /// was not registered.
    pub fn remove_listener(&self, listener: &ListenerHandle<A>) -> bool {
        let removed = {
            let mut listeners = self.listeners.borrow_mut();
            let index = listeners.iter().position(|l| same_listener(l, listener));
            index.map(|index| listeners.remove(index))
        };

        match removed {
            Some(removed) => {
                tracing::trace!(listeners = self.len(), "listener removed");
                removed.lifecycle(Lifecycle::Removed);
                true
            }
            None => false,
        }
    }

    /// Unregister every listener, running each `Removed` hook exactly once.
    /// Returns how many listeners were removed.
    pub fn remove_all_listeners(&self) -> usize {
        let removed = self.listeners.take();
        for listener in &removed {
            listener.lifecycle(Lifecycle::Removed);
        }
        tracing::trace!(removed = removed.len(), "all listeners removed");
        removed.len()
    }

    /// Invoke every registered listener with `args`, in registration order.
    pub fn notify(&self, args: &A) -> CallbackResult {
        let listeners = self.listeners.borrow().clone();
        tracing::trace!(listeners = listeners.len(), "notifying");
        for listener in &listeners {
            listener.call(args)?;
        }
        Ok(())
    }

    /// Check whether a listener is registered.
    pub fn contains(&self, listener: &ListenerHandle<A>) -> bool {
        self.listeners
            .borrow()
            .iter()
            .any(|l| same_listener(l, listener))
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<A> Default for ObserverHub<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for ObserverHub<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverHub")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::listener::{listener, with_lifecycle, CallbackError};
    use std::cell::RefCell;

    fn recorder(log: &Rc<RefCell<Vec<String>>>, name: &'static str) -> ListenerHandle<u32> {
        let log = Rc::clone(log);
        listener(move |n: &u32| {
            log.borrow_mut().push(format!("{name}:{n}"));
            Ok(())
        })
    }

    #[test]
    fn notify_calls_listeners_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let hub = ObserverHub::new();
        hub.add_listener(&recorder(&log, "a"));
        hub.add_listener(&recorder(&log, "b"));
        hub.add_listener(&recorder(&log, "c"));

        hub.notify(&1).unwrap();

        assert_eq!(*log.borrow(), vec!["a:1", "b:1", "c:1"]);
    }

    #[test]
    fn add_listener_is_idempotent() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let hub = ObserverHub::new();
        let a = recorder(&log, "a");

        assert!(hub.add_listener(&a));
        assert!(!hub.add_listener(&a));
        hub.notify(&2).unwrap();

        assert_eq!(hub.len(), 1);
        assert_eq!(*log.borrow(), vec!["a:2"]);
    }

    #[test]
    fn remove_unknown_listener_is_noop() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let hub: ObserverHub<u32> = ObserverHub::new();

        assert!(!hub.remove_listener(&recorder(&log, "ghost")));
        assert!(hub.is_empty());
    }

    #[test]
    fn remove_all_then_notify_calls_nothing() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let hub = ObserverHub::new();
        hub.add_listener(&recorder(&log, "a"));
        hub.add_listener(&recorder(&log, "b"));

        assert_eq!(hub.remove_all_listeners(), 2);
        hub.notify(&3).unwrap();

        assert!(log.borrow().is_empty());
    }

    #[test]
    fn lifecycle_hooks_fire_once_per_registration_change() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let hooked = with_lifecycle(|_: &u32| Ok(()), move |e| sink.borrow_mut().push(e));
        let hub = ObserverHub::new();

        hub.add_listener(&hooked);
        hub.add_listener(&hooked);
        hub.remove_listener(&hooked);
        hub.remove_listener(&hooked);
        hub.add_listener(&hooked);
        hub.remove_all_listeners();

        assert_eq!(
            *events.borrow(),
            vec![
                Lifecycle::Added,
                Lifecycle::Removed,
                Lifecycle::Added,
                Lifecycle::Removed
            ]
        );
    }

    #[test]
    fn failing_listener_stops_the_broadcast() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let hub = ObserverHub::new();
        hub.add_listener(&recorder(&log, "before"));
        hub.add_listener(&listener(|_: &u32| Err(CallbackError::msg("boom"))));
        hub.add_listener(&recorder(&log, "after"));

        let err = hub.notify(&4).unwrap_err();

        assert_eq!(err.to_string(), "boom");
        assert_eq!(*log.borrow(), vec!["before:4"]);
    }

    #[test]
    fn registration_changes_during_notify_apply_next_time() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let hub = Rc::new(ObserverHub::new());
        let late = recorder(&log, "late");

        let weak_hub = Rc::downgrade(&hub);
        let late_clone = Rc::clone(&late);
        hub.add_listener(&listener(move |_: &u32| {
            if let Some(hub) = weak_hub.upgrade() {
                hub.add_listener(&late_clone);
            }
            Ok(())
        }));

        hub.notify(&5).unwrap();
        assert!(log.borrow().is_empty());

        hub.notify(&6).unwrap();
        assert_eq!(*log.borrow(), vec!["late:6"]);
    }
}
