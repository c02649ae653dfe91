//! Reusable publish/subscribe observer abstraction.
//!
//! An [`ObserverHub`] fans a payload out to every registered [`Listener`],
//! synchronously and in registration order. The payload type is generic, so
//! broadcasts of any arity are expressed as tuples or small structs.

mod hub;
mod listener;

pub use hub::ObserverHub;
pub use listener::{
    listener, with_lifecycle, CallbackError, CallbackResult, Lifecycle, Listener, ListenerHandle,
    WithLifecycle,
};
