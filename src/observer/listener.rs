//! Listener callbacks and their lifecycle hooks.

use std::rc::Rc;
use thiserror::Error;

/// Failure raised by a listener or a transition mutator.
///
/// Callback failures are never swallowed: they abort the notification or
/// transition in progress and propagate to whoever started it.
#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Source(#[from] Box<dyn std::error::Error + 'static>),
}

impl CallbackError {
    /// Build a failure from a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Result returned by every listener and mutator.
pub type CallbackResult = Result<(), CallbackError>;

/// Registration events reported to a listener's lifecycle hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Added,
    Removed,
}

/// A callback registered with an [`ObserverHub`](super::ObserverHub).
///
/// Plain closures `Fn(&A) -> CallbackResult` are listeners. Types that need
/// to know when they are registered or unregistered override
/// [`lifecycle`](Listener::lifecycle).
pub trait Listener<A> {
    /// Receive one broadcast.
    fn call(&self, args: &A) -> CallbackResult;

    /// Called by the hub after this listener is added or removed.
    fn lifecycle(&self, _event: Lifecycle) {}
}

impl<A, F> Listener<A> for F
where
    F: Fn(&A) -> CallbackResult,
{
    fn call(&self, args: &A) -> CallbackResult {
        self(args)
    }
}

/// Shared handle to a listener. Hubs identify listeners by handle identity,
/// so keep a clone of the handle to remove it later.
pub type ListenerHandle<A> = Rc<dyn Listener<A>>;

/// Wrap a closure into a shareable listener handle.
///
/// Types implementing [`Listener`] directly are shared with `Rc::new`.
///
/// # Example
///
/// ```rust
/// use tilelock::observer::{listener, ObserverHub};
///
/// let hub = ObserverHub::new();
/// let log = listener(|n: &u32| {
///     assert_eq!(*n, 7);
///     Ok(())
/// });
///
/// hub.add_listener(&log);
/// hub.notify(&7).unwrap();
/// ```
pub fn listener<A, F>(callback: F) -> ListenerHandle<A>
where
    F: Fn(&A) -> CallbackResult + 'static,
{
    Rc::new(callback)
}

/// Listener paired with a lifecycle hook.
pub struct WithLifecycle<F, H> {
    callback: F,
    hook: H,
}

impl<A, F, H> Listener<A> for WithLifecycle<F, H>
where
    F: Fn(&A) -> CallbackResult,
    H: Fn(Lifecycle),
{
    fn call(&self, args: &A) -> CallbackResult {
        (self.callback)(args)
    }

    fn lifecycle(&self, event: Lifecycle) {
        (self.hook)(event)
    }
}

/// Attach a lifecycle hook to a callback.
pub fn with_lifecycle<A, F, H>(callback: F, hook: H) -> ListenerHandle<A>
where
    F: Fn(&A) -> CallbackResult + 'static,
    H: Fn(Lifecycle) + 'static,
{
    Rc::new(WithLifecycle { callback, hook })
}

/// Identity of the listener behind a handle, ignoring vtable metadata.
pub(crate) fn same_listener<A>(a: &ListenerHandle<A>, b: &ListenerHandle<A>) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}
