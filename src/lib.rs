//! Tilelock: a reactive core for pattern-lock puzzles
//!
//! Tilelock drives a pattern-lock grid from pointer events. Its core is
//! generic and usable on its own: a table-driven state machine whose
//! transitions run data mutations and broadcast to observers, a deep
//! structural comparator, and helpers for building self-referencing records.
//! Everything is single-threaded and synchronous.
//!
//! # Core Concepts
//!
//! - **Enumerations**: closed sets of states and transition keys, declared
//!   statically with [`enumeration!`] or at runtime with
//!   [`core::declare_enum`]
//! - **Machine**: a [`machine::Machine`] built from a
//!   [`builder::TransitionTable`] whose entries are next states or actions
//! - **Observers**: an [`observer::ObserverHub`] fans broadcasts out in
//!   registration order
//! - **Equality**: [`equality::equals`] compares values structurally and
//!   terminates on cyclic data
//! - **Deferred construction**: [`deferred::build_deferred`] lets an object's
//!   closures refer to the object itself
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use tilelock::observer::listener;
//! use tilelock::puzzle::{Point, PuzzleConfig, Session, Tile};
//!
//! let mut session = Session::new(PuzzleConfig::default()).unwrap();
//! let patterns = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&patterns);
//! let on_pattern = listener(move |tiles: &Vec<Tile>| {
//!     sink.borrow_mut().push(tiles.clone());
//!     Ok(())
//! });
//! session.on_pattern(&on_pattern);
//!
//! session.press(Tile::new(0, 0)).unwrap();
//! session.hover(Some(Tile::new(1, 1)), Point::new(15.0, 15.0)).unwrap();
//! session.hover(Some(Tile::new(2, 2)), Point::new(25.0, 25.0)).unwrap();
//! session.release().unwrap();
//!
//! assert_eq!(
//!     patterns.borrow()[0],
//!     vec![Tile::new(0, 0), Tile::new(1, 1), Tile::new(2, 2)]
//! );
//! ```

pub mod builder;
pub mod core;
pub mod deferred;
pub mod equality;
pub mod machine;
pub mod observer;
pub mod puzzle;

// Re-export commonly used types
pub use builder::{BuildError, Row, TransitionTable};
pub use crate::core::{declare_enum, Enumeration, Label};
pub use equality::{equals, suppress_unless_changed, Value};
pub use machine::{Machine, MachineOptions, TransitionError, TransitionEvent};
pub use observer::{listener, ObserverHub};
