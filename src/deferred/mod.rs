//! Two-phase construction of self-referencing objects.
//!
//! An object's behavior sometimes has to call back into the object itself:
//! a property setter that broadcasts a snapshot of all properties, for
//! instance. [`build_deferred`] allocates the object's identity first, hands
//! the factory a [`SelfRef`] to that identity, and binds the finished value
//! to it. Closures created by the factory capture the `SelfRef` and resolve
//! it at call time, when the object is complete.

mod property;

pub use property::{GetHook, ObservedProperty, SetHook};

use std::cell::OnceCell;
use std::fmt;
use std::rc::{Rc, Weak};
use thiserror::Error;

/// Errors resolving a [`SelfRef`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeferredError {
    #[error("'{type_name}' was referenced before construction finished")]
    NotYetBuilt { type_name: &'static str },

    #[error("'{type_name}' has already been dropped")]
    Released { type_name: &'static str },
}

/// Handle to an object under construction, resolvable once it is built.
pub struct SelfRef<T> {
    target: Weak<T>,
    built: Rc<OnceCell<()>>,
}

impl<T> SelfRef<T> {
    /// Resolve to the finished object.
    pub fn get(&self) -> Result<Rc<T>, DeferredError> {
        let type_name = std::any::type_name::<T>();
        if !self.is_built() {
            return Err(DeferredError::NotYetBuilt { type_name });
        }
        self.target
            .upgrade()
            .ok_or(DeferredError::Released { type_name })
    }

    /// Whether construction has finished. Once set this never reverts.
    pub fn is_built(&self) -> bool {
        self.built.get().is_some()
    }
}

impl<T> Clone for SelfRef<T> {
    fn clone(&self) -> Self {
        Self {
            target: Weak::clone(&self.target),
            built: Rc::clone(&self.built),
        }
    }
}

impl<T> fmt::Debug for SelfRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelfRef")
            .field("type", &std::any::type_name::<T>())
            .field("built", &self.is_built())
            .finish()
    }
}

/// Build an object whose factory needs a reference to the object itself.
///
/// The returned `Rc` is the exact identity every `SelfRef` handed out during
/// construction resolves to.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use tilelock::deferred::{build_deferred, SelfRef};
///
/// struct Counter {
///     count: Cell<u32>,
///     bump: Box<dyn Fn()>,
///     me: SelfRef<Counter>,
/// }
///
/// let counter = build_deferred(|me: SelfRef<Counter>| {
///     let handle = me.clone();
///     Counter {
///         count: Cell::new(0),
///         bump: Box::new(move || {
///             if let Ok(counter) = handle.get() {
///                 counter.count.set(counter.count.get() + 1);
///             }
///         }),
///         me,
///     }
/// });
///
/// (counter.bump)();
/// assert_eq!(counter.count.get(), 1);
/// assert!(counter.me.is_built());
/// ```
pub fn build_deferred<T, F>(factory: F) -> Rc<T>
where
    F: FnOnce(SelfRef<T>) -> T,
{
    let built = Rc::new(OnceCell::new());
    let root = Rc::new_cyclic(|target| {
        factory(SelfRef {
            target: Weak::clone(target),
            built: Rc::clone(&built),
        })
    });
    // Only the first set can succeed; the flag is frozen afterwards.
    let _ = built.set(());
    tracing::trace!(type_name = std::any::type_name::<T>(), "deferred object built");
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Node {
        label: String,
        peers: Vec<String>,
        describe: Box<dyn Fn() -> String>,
    }

    #[test]
    fn closures_see_the_fully_built_object() {
        let node = build_deferred(|me: SelfRef<Node>| Node {
            label: "root".to_string(),
            peers: vec!["a".to_string(), "b".to_string()],
            describe: Box::new(move || match me.get() {
                Ok(node) => format!("{} -> {}", node.label, node.peers.join(",")),
                Err(err) => err.to_string(),
            }),
        });

        assert_eq!((node.describe)(), "root -> a,b");
    }

    #[test]
    fn resolving_during_construction_fails() {
        let observed = RefCell::new(None);
        let _node = build_deferred(|me: SelfRef<Node>| {
            *observed.borrow_mut() = Some(me.get().map(|_| ()));
            Node {
                label: String::new(),
                peers: Vec::new(),
                describe: Box::new(String::new),
            }
        });

        assert!(matches!(
            observed.into_inner(),
            Some(Err(DeferredError::NotYetBuilt { .. }))
        ));
    }

    #[test]
    fn resolved_identity_is_the_returned_object() {
        let captured: RefCell<Option<SelfRef<Node>>> = RefCell::new(None);
        let node = build_deferred(|me: SelfRef<Node>| {
            *captured.borrow_mut() = Some(me);
            Node {
                label: "x".to_string(),
                peers: Vec::new(),
                describe: Box::new(String::new),
            }
        });

        let me = captured.into_inner().unwrap();
        assert!(me.is_built());
        assert!(Rc::ptr_eq(&me.get().unwrap(), &node));
    }

    #[test]
    fn resolving_after_drop_fails() {
        let captured: RefCell<Option<SelfRef<Node>>> = RefCell::new(None);
        let node = build_deferred(|me: SelfRef<Node>| {
            *captured.borrow_mut() = Some(me);
            Node {
                label: String::new(),
                peers: Vec::new(),
                describe: Box::new(String::new),
            }
        });
        drop(node);

        let me = captured.into_inner().unwrap();
        assert!(matches!(me.get(), Err(DeferredError::Released { .. })));
    }
}
