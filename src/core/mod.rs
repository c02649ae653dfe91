//! Closed enumerations for states and transition keys.
//!
//! This module contains:
//! - The `Label` and `Enumeration` traits implemented by statically declared
//!   enumerations (see the [`enumeration!`](crate::enumeration) macro)
//! - `declare_enum`, the runtime declaration facility with validated,
//!   bidirectional symbol lookup

mod declare;
mod enumeration;

pub use declare::{declare_enum, DeclarationError, DeclarationViolation, DeclaredEnum, Symbol};
pub use enumeration::{Enumeration, Label};
