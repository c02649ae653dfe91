//! Errors raised while constructing a state machine.

use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Transition table has no states. Add a row or pass an initial state")]
    EmptyTable,
}
