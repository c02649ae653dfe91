//! Puzzle configuration.

use super::tiles::Tile;
use crate::equality::EqualityOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading or validating a [`PuzzleConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse puzzle config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Grid must have at least one column and one row, got {columns}x{rows}")]
    EmptyGrid { columns: u32, rows: u32 },
}

/// Grid size and drawing limits for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    pub columns: u32,
    pub rows: u32,
    /// The in-progress line is only drawn while fewer than this many lines
    /// are completed.
    pub max_segments: usize,
    pub equality: EqualityOptions,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            columns: 3,
            rows: 3,
            max_segments: 9,
            equality: EqualityOptions::default(),
        }
    }
}

impl PuzzleConfig {
    /// Parse and validate a JSON document. Missing fields take their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        tracing::debug!(
            columns = config.columns,
            rows = config.rows,
            max_segments = config.max_segments,
            "puzzle config loaded"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(())
    }

    /// Whether `tile` lies on the grid.
    pub fn contains(&self, tile: Tile) -> bool {
        tile.column < self.columns && tile.row < self.rows
    }
}
