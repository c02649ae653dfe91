//! Table-driven state machine engine.
//!
//! A [`Machine`] is created from a factory that builds its
//! [`TransitionTable`](crate::builder::TransitionTable). Each entry is
//! either a plain next state or an [`Action`] that mutates the shared data
//! before the state changes. Every successful transition is broadcast as a
//! [`TransitionEvent`] through the machine's observer hub.

mod engine;
mod transition;

pub use engine::{Machine, MachineListener, MachineOptions};
pub use transition::{Action, ActionFactory, Mutator, Target, TransitionError, TransitionEvent};
