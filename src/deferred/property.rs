//! Named value cells with read and write hooks.

use crate::observer::CallbackResult;
use std::cell::RefCell;
use std::fmt;

/// Hook run on every read: `(name, value)`.
pub type GetHook<T> = Box<dyn Fn(&str, &T)>;

/// Hook run after every write: `(name, old, new)`. A failing hook fails the
/// write, although the new value has already been stored.
pub type SetHook<T> = Box<dyn Fn(&str, &T, &T) -> CallbackResult>;

/// A named, observed value.
pub struct ObservedProperty<T> {
    name: &'static str,
    value: RefCell<T>,
    on_get: Option<GetHook<T>>,
    on_set: Option<SetHook<T>>,
}

impl<T: Clone> ObservedProperty<T> {
    pub fn new(name: &'static str, initial: T) -> Self {
        Self {
            name,
            value: RefCell::new(initial),
            on_get: None,
            on_set: None,
        }
    }

    pub fn on_get<H>(mut self, hook: H) -> Self
    where
        H: Fn(&str, &T) + 'static,
    {
        self.on_get = Some(Box::new(hook));
        self
    }

    pub fn on_set<H>(mut self, hook: H) -> Self
    where
        H: Fn(&str, &T, &T) -> CallbackResult + 'static,
    {
        self.on_set = Some(Box::new(hook));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Read a copy of the current value.
    pub fn get(&self) -> T {
        let value = self.value.borrow().clone();
        if let Some(hook) = &self.on_get {
            hook(self.name, &value);
        }
        value
    }

    /// Store `value`, then run the set hook with the old and new values.
    pub fn set(&self, value: T) -> CallbackResult {
        let old = self.value.replace(value.clone());
        match &self.on_set {
            Some(hook) => hook(self.name, &old, &value),
            None => Ok(()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservedProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservedProperty")
            .field("name", &self.name)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}
