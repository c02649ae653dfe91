//! Builder API for transition tables.
//!
//! Tables are assembled fluently from [`Row`]s, either state by state or
//! exhaustively over an [`enumeration!`](crate::enumeration) of states.

pub mod error;
pub mod macros;
pub mod table;

pub use error::BuildError;
pub use table::{Row, TransitionTable};
