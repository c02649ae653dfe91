//! Table-driven state machine with broadcast transitions.

use super::transition::{ActionFactory, Target, TransitionError, TransitionEvent};
use crate::builder::{BuildError, TransitionTable};
use crate::core::Label;
use crate::observer::{ListenerHandle, ObserverHub};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Listener registered on a machine's transition broadcast.
pub type MachineListener<S, D> = ListenerHandle<TransitionEvent<S, D>>;

/// Construction options for [`Machine::create`].
pub struct MachineOptions<S, D> {
    pub initial_state: Option<S>,
    pub data: Rc<D>,
}

impl<S, D> MachineOptions<S, D> {
    /// Options sharing `data`, starting in the table's first state.
    pub fn new(data: Rc<D>) -> Self {
        Self {
            initial_state: None,
            data,
        }
    }

    /// Start in `state` instead of the table's first state.
    pub fn initial(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }
}

/// State machine driven by a transition table.
///
/// The current state is the only field the machine mutates. The shared data
/// is owned elsewhere and changed only by the table's actions. Every
/// successful [`change`](Machine::change) is broadcast to the machine's
/// observers as a [`TransitionEvent`].
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use tilelock::builder::{Row, TransitionTable};
/// use tilelock::enumeration;
/// use tilelock::machine::{Machine, MachineOptions};
///
/// enumeration! {
///     enum Turnstile { Locked, Unlocked }
/// }
/// enumeration! {
///     enum Input { Coin, Push }
/// }
///
/// let machine = Machine::create(
///     |coins: &Rc<Cell<u32>>, action| {
///         let coins = Rc::clone(coins);
///         TransitionTable::exhaustive(|state| match state {
///             Turnstile::Locked => {
///                 let coins = Rc::clone(&coins);
///                 Row::new().on(
///                     Input::Coin,
///                     action.to(Turnstile::Unlocked, move |_: Option<()>| {
///                         coins.set(coins.get() + 1);
///                         Ok(())
///                     }),
///                 )
///             }
///             Turnstile::Unlocked => Row::new().go(Input::Push, Turnstile::Locked),
///         })
///     },
///     MachineOptions::new(Rc::new(Cell::new(0))),
/// )
/// .unwrap();
///
/// machine.change(Input::Coin, None).unwrap();
/// assert_eq!(machine.current_state(), Turnstile::Unlocked);
/// assert_eq!(machine.data().get(), 1);
/// assert!(machine.change(Input::Coin, None).is_err());
/// ```
pub struct Machine<S, K, D, P = ()> {
    current: RefCell<S>,
    table: TransitionTable<S, K, P>,
    data: Rc<D>,
    observers: ObserverHub<TransitionEvent<S, D>>,
}

impl<S: Label, K: Label, D, P> Machine<S, K, D, P> {
    /// Build a machine from a table factory.
    ///
    /// `factory` runs once, with the shared data and an action constructor.
    /// Without an explicit initial state the machine starts in the state of
    /// the table's first row, which fails for an empty table.
    pub fn create<F>(factory: F, options: MachineOptions<S, D>) -> Result<Self, BuildError>
    where
        F: FnOnce(&Rc<D>, ActionFactory<S, P>) -> TransitionTable<S, K, P>,
    {
        let MachineOptions {
            initial_state,
            data,
        } = options;
        let table = factory(&data, ActionFactory::new());
        let initial = match initial_state {
            Some(state) => state,
            None => table
                .initial_state()
                .cloned()
                .ok_or(BuildError::EmptyTable)?,
        };

        tracing::debug!(initial = initial.label(), states = table.len(), "machine created");

        Ok(Self {
            current: RefCell::new(initial),
            table,
            data,
            observers: ObserverHub::new(),
        })
    }

    pub fn current_state(&self) -> S {
        self.current.borrow().clone()
    }

    /// Check whether `key` names a transition from the current state.
    pub fn can_change(&self, key: &K) -> bool {
        self.table.lookup(&self.current.borrow(), key).is_some()
    }

    /// Take the transition `key` from the current state.
    ///
    /// An action's mutator runs with `payload` before the state changes; if
    /// it fails the state is left as it was. Observers are notified after
    /// the state has changed, and a failing observer's error is returned
    /// with the new state kept.
    pub fn change(&self, key: K, payload: impl Into<Option<P>>) -> Result<(), TransitionError> {
        let previous = self.current_state();
        let target =
            self.table
                .lookup(&previous, &key)
                .ok_or_else(|| TransitionError::InvalidTransition {
                    key: key.label().to_string(),
                    state: previous.label().to_string(),
                })?;

        let next = match target {
            Target::State(state) => state.clone(),
            Target::Action(action) => {
                action.mutate(payload.into())?;
                action.target().clone()
            }
        };

        self.current.replace(next.clone());
        tracing::debug!(
            key = key.label(),
            from = previous.label(),
            to = next.label(),
            "transition"
        );

        self.observers.notify(&TransitionEvent {
            previous,
            next,
            data: Rc::clone(&self.data),
        })?;
        Ok(())
    }

    pub fn data(&self) -> &Rc<D> {
        &self.data
    }

    pub fn table(&self) -> &TransitionTable<S, K, P> {
        &self.table
    }

    /// The hub broadcasting this machine's transitions.
    pub fn observers(&self) -> &ObserverHub<TransitionEvent<S, D>> {
        &self.observers
    }

    pub fn add_listener(&self, listener: &MachineListener<S, D>) -> bool {
        self.observers.add_listener(listener)
    }

    pub fn remove_listener(&self, listener: &MachineListener<S, D>) -> bool {
        self.observers.remove_listener(listener)
    }

    pub fn remove_all_listeners(&self) -> usize {
        self.observers.remove_all_listeners()
    }
}

impl<S: Label, K: Label, D, P> fmt::Debug for Machine<S, K, D, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("current", &self.current)
            .field("states", &self.table.len())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
