//! Grid tiles and the trail of tiles visited by a gesture.

use crate::equality::{Arguments, Value};
use crate::observer::{CallbackResult, ListenerHandle, ObserverHub};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;

/// A grid cell, addressed by column and row.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Tile {
    pub column: u32,
    pub row: u32,
}

impl Tile {
    pub fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }
}

impl From<(u32, u32)> for Tile {
    fn from((column, row): (u32, u32)) -> Self {
        Self::new(column, row)
    }
}

impl From<Tile> for Value {
    fn from(tile: Tile) -> Self {
        Value::array([Value::from(tile.column), Value::from(tile.row)])
    }
}

impl Arguments for Tile {
    fn to_arguments(&self) -> Value {
        Value::array([Value::from(*self)])
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.column, self.row)
    }
}

/// Shared game data: the tiles of the gesture in progress.
///
/// The trail never holds the same tile twice. Committing broadcasts a copy
/// of the tiles to the trail's observers and then clears it.
#[derive(Default)]
pub struct TileTrail {
    tiles: RefCell<Vec<Tile>>,
    committed: ObserverHub<Vec<Tile>>,
}

impl TileTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `tile` unless it is already in the trail. Returns whether it
    /// was appended.
    pub fn push(&self, tile: Tile) -> bool {
        let mut tiles = self.tiles.borrow_mut();
        if tiles.contains(&tile) {
            return false;
        }
        tiles.push(tile);
        tracing::debug!(%tile, len = tiles.len(), "tile pushed");
        true
    }

    /// Broadcast the current tiles, then clear them.
    ///
    /// If a listener fails the tiles are kept.
    pub fn commit(&self) -> CallbackResult {
        let snapshot = self.tiles();
        tracing::debug!(len = snapshot.len(), "committing pattern");
        self.committed.notify(&snapshot)?;
        self.tiles.borrow_mut().clear();
        Ok(())
    }

    /// Copy of the tiles in visiting order.
    pub fn tiles(&self) -> Vec<Tile> {
        self.tiles.borrow().clone()
    }

    pub fn last(&self) -> Option<Tile> {
        self.tiles.borrow().last().copied()
    }

    pub fn len(&self) -> usize {
        self.tiles.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.borrow().is_empty()
    }

    /// Hub receiving every committed pattern.
    pub fn observers(&self) -> &ObserverHub<Vec<Tile>> {
        &self.committed
    }

    pub fn add_listener(&self, listener: &ListenerHandle<Vec<Tile>>) -> bool {
        self.committed.add_listener(listener)
    }
}

impl fmt::Debug for TileTrail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileTrail")
            .field("tiles", &self.tiles.borrow())
            .field("observers", &self.committed.len())
            .finish()
    }
}
