//! Change-suppressing function wrapper.

use super::compare::{Comparator, EqualityError};
use super::value::Value;

/// An argument list that can be compared structurally.
pub trait Arguments {
    /// The argument list as a sequence value.
    fn to_arguments(&self) -> Value;
}

impl Arguments for Vec<Value> {
    fn to_arguments(&self) -> Value {
        Value::array(self.iter().cloned())
    }
}

impl Arguments for Value {
    fn to_arguments(&self) -> Value {
        Value::array([self.clone()])
    }
}

/// Wraps a function so that a call whose argument list is structurally equal
/// to the previous call's is skipped.
///
/// The remembered argument list starts out empty, so the first call with
/// any argument runs the function. Comparator errors propagate and leave
/// the remembered arguments unchanged.
///
/// # Example
///
/// ```rust
/// use tilelock::equality::{suppress_unless_changed, Value};
///
/// let mut calls = 0;
/// let mut wrapped = suppress_unless_changed(|args: &Vec<Value>| {
///     calls += 1;
///     args.len()
/// });
///
/// assert_eq!(wrapped.call(vec![Value::from(5)]).unwrap(), Some(1));
/// assert_eq!(wrapped.call(vec![Value::from(5)]).unwrap(), None);
/// assert_eq!(wrapped.call(vec![Value::from(6)]).unwrap(), Some(1));
/// drop(wrapped);
/// assert_eq!(calls, 2);
/// ```
pub struct SuppressUnlessChanged<A, F> {
    inner: F,
    previous: Value,
    comparator: Comparator,
    _args: std::marker::PhantomData<fn(A)>,
}

impl<A, F, R> SuppressUnlessChanged<A, F>
where
    A: Arguments,
    F: FnMut(&A) -> R,
{
    pub fn new(inner: F) -> Self {
        Self::with_comparator(inner, Comparator::default())
    }

    pub fn with_comparator(inner: F, comparator: Comparator) -> Self {
        Self {
            inner,
            previous: Value::array([]),
            comparator,
            _args: std::marker::PhantomData,
        }
    }

    /// Call the wrapped function unless `args` equals the previous
    /// arguments. Returns `None` when the call was suppressed.
    pub fn call(&mut self, args: A) -> Result<Option<R>, EqualityError> {
        let next = args.to_arguments();
        if self.comparator.equals(&self.previous, &next)? {
            tracing::trace!("suppressed unchanged call");
            return Ok(None);
        }

        self.previous = next;
        Ok(Some((self.inner)(&args)))
    }

    /// Forget the remembered arguments so the next non-empty call runs.
    pub fn reset(&mut self) {
        self.previous = Value::array([]);
    }

    /// The argument list of the last call that ran, as a sequence value.
    pub fn previous(&self) -> &Value {
        &self.previous
    }
}

/// Wrap `inner` in a [`SuppressUnlessChanged`] using the default comparator.
pub fn suppress_unless_changed<A, F, R>(inner: F) -> SuppressUnlessChanged<A, F>
where
    A: Arguments,
    F: FnMut(&A) -> R,
{
    SuppressUnlessChanged::new(inner)
}
