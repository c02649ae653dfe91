//! The pattern-lock puzzle built on the reactive core.
//!
//! Pointer events drive a [`PointerMachine`] over a shared [`TileTrail`].
//! Each transition redraws the [`LineBuffer`], and releasing the pointer
//! commits the trail as a finished pattern. A [`Session`] owns all of it.

mod config;
mod lines;
mod session;
mod tiles;

pub use config::{ConfigError, PuzzleConfig};
pub use lines::{segments_of, LineBuffer, LineSnapshot, PendingSegment, Point, Segment};
pub use session::{pointer_machine, PointerKey, PointerMachine, PointerState, Session, SessionError};
pub use tiles::{Tile, TileTrail};
