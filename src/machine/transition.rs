//! Transition outcomes, actions and errors.

use crate::observer::{CallbackError, CallbackResult};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

/// Errors that can occur while changing state.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error("Could not find valid transition {key} from current state {state}")]
    InvalidTransition { key: String, state: String },

    #[error("Transition callback failed: {0}")]
    Callback(#[from] CallbackError),
}

/// Procedure run by an [`Action`] with the transition's payload.
///
/// Mutators change externally owned shared data, never the machine's state.
pub type Mutator<P> = Rc<dyn Fn(Option<P>) -> CallbackResult>;

/// A transition outcome that mutates shared data and names the next state.
pub struct Action<S, P> {
    target: S,
    mutator: Mutator<P>,
}

impl<S, P> Action<S, P> {
    pub fn new<F>(target: S, mutator: F) -> Self
    where
        F: Fn(Option<P>) -> CallbackResult + 'static,
    {
        Self {
            target,
            mutator: Rc::new(mutator),
        }
    }

    /// State the machine moves to once the mutator has completed.
    pub fn target(&self) -> &S {
        &self.target
    }

    /// Run the mutator.
    pub fn mutate(&self, payload: Option<P>) -> CallbackResult {
        (self.mutator)(payload)
    }
}

impl<S: Clone, P> Clone for Action<S, P> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            mutator: Rc::clone(&self.mutator),
        }
    }
}

impl<S: fmt::Debug, P> fmt::Debug for Action<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// Entry of a transition table: a plain next state, or an action.
pub enum Target<S, P> {
    State(S),
    Action(Action<S, P>),
}

impl<S, P> Target<S, P> {
    /// The state this entry leads to.
    pub fn state(&self) -> &S {
        match self {
            Target::State(state) => state,
            Target::Action(action) => action.target(),
        }
    }

    pub fn is_action(&self) -> bool {
        matches!(self, Target::Action(_))
    }
}

impl<S: Clone, P> Clone for Target<S, P> {
    fn clone(&self) -> Self {
        match self {
            Target::State(state) => Target::State(state.clone()),
            Target::Action(action) => Target::Action(action.clone()),
        }
    }
}

impl<S: fmt::Debug, P> fmt::Debug for Target<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::State(state) => f.debug_tuple("State").field(state).finish(),
            Target::Action(action) => f.debug_tuple("Action").field(action).finish(),
        }
    }
}

/// Action constructor handed to transition table factories.
pub struct ActionFactory<S, P> {
    _marker: PhantomData<fn(S, P)>,
}

impl<S, P> ActionFactory<S, P> {
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    /// An action moving to `target` after running `mutator`.
    pub fn to<F>(&self, target: S, mutator: F) -> Target<S, P>
    where
        F: Fn(Option<P>) -> CallbackResult + 'static,
    {
        Target::Action(Action::new(target, mutator))
    }
}

impl<S, P> Clone for ActionFactory<S, P> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<S, P> Copy for ActionFactory<S, P> {}

/// Broadcast after every successful transition.
pub struct TransitionEvent<S, D> {
    pub previous: S,
    pub next: S,
    pub data: Rc<D>,
}

impl<S: fmt::Debug, D> fmt::Debug for TransitionEvent<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionEvent")
            .field("previous", &self.previous)
            .field("next", &self.next)
            .finish_non_exhaustive()
    }
}
