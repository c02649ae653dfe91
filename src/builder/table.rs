//! Builder for transition tables.

use crate::core::Enumeration;
use crate::machine::Target;

/// Transitions available from one state, keyed by transition key.
pub struct Row<K, S, P> {
    entries: Vec<(K, Target<S, P>)>,
}

impl<K: PartialEq, S, P> Row<K, S, P> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Map `key` to `target`, replacing an earlier entry for the same key.
    pub fn on(mut self, key: K, target: Target<S, P>) -> Self {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = target,
            None => self.entries.push((key, target)),
        }
        self
    }

    /// Map `key` to a plain next state.
    pub fn go(self, key: K, state: S) -> Self {
        self.on(key, Target::State(state))
    }

    pub fn get(&self, key: &K) -> Option<&Target<S, P>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, target)| target)
    }

    /// Keys available from this row, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: PartialEq, S, P> Default for Row<K, S, P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Mapping from state to the transitions available from it.
///
/// Rows keep insertion order; the first row's state is the default initial
/// state of a machine. A table is only consulted after construction, never
/// modified.
///
/// # Example
///
/// ```
/// use tilelock::builder::{Row, TransitionTable};
/// use tilelock::enumeration;
///
/// enumeration! {
///     enum Light { Red, Green }
/// }
/// enumeration! {
///     enum Signal { Go, Stop }
/// }
///
/// let table: TransitionTable<Light, Signal, ()> = TransitionTable::exhaustive(|light| match light {
///     Light::Red => Row::new().go(Signal::Go, Light::Green),
///     Light::Green => Row::new().go(Signal::Stop, Light::Red),
/// });
///
/// assert_eq!(table.initial_state(), Some(&Light::Red));
/// assert!(table.lookup(&Light::Red, &Signal::Stop).is_none());
/// ```
pub struct TransitionTable<S, K, P> {
    rows: Vec<(S, Row<K, S, P>)>,
}

impl<S: PartialEq, K: PartialEq, P> TransitionTable<S, K, P> {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Set the row for `state`, replacing an earlier row for the same state
    /// in place.
    pub fn state(mut self, state: S, row: Row<K, S, P>) -> Self {
        match self.rows.iter_mut().find(|(s, _)| *s == state) {
            Some((_, slot)) => *slot = row,
            None => self.rows.push((state, row)),
        }
        self
    }

    /// Build a table with one row per member of an enumeration, in
    /// declaration order. Writing `rows` as a `match` makes the compiler
    /// check that every state is covered.
    pub fn exhaustive<F>(mut rows: F) -> Self
    where
        S: Enumeration,
        F: FnMut(S) -> Row<K, S, P>,
    {
        S::ALL
            .iter()
            .fold(Self::new(), |table, state| table.state(*state, rows(*state)))
    }

    /// Entry for `key` in the row of `state`.
    pub fn lookup(&self, state: &S, key: &K) -> Option<&Target<S, P>> {
        self.row(state).and_then(|row| row.get(key))
    }

    pub fn row(&self, state: &S) -> Option<&Row<K, S, P>> {
        self.rows
            .iter()
            .find(|(s, _)| s == state)
            .map(|(_, row)| row)
    }

    /// State of the first row.
    pub fn initial_state(&self) -> Option<&S> {
        self.rows.first().map(|(state, _)| state)
    }

    /// States with a row, in table order.
    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.rows.iter().map(|(state, _)| state)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<S: PartialEq, K: PartialEq, P> Default for TransitionTable<S, K, P> {
    fn default() -> Self {
        Self::new()
    }
}
