//! Grid configuration supplied by the surrounding shell.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed edge length of a grid cell in pixels.
pub const CELL_SIZE: f64 = 60.0;

/// Uniform padding around the grid, applied by the rendering caller.
pub const GRID_PADDING: f64 = 16.0;

/// Row count range exposed by the shell's slider.
pub const MIN_ROWS: u32 = 1;
pub const MAX_ROWS: u32 = 10;

/// Column count range exposed by the shell's slider.
pub const MIN_COLUMNS: u32 = 1;
pub const MAX_COLUMNS: u32 = 15;

/// Largest gap the shell's slider offers, in pixels.
pub const MAX_GAP: f64 = 20.0;

/// Error produced when a grid configuration is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid must have at least one row")]
    ZeroRows,
    #[error("grid must have at least one column")]
    ZeroColumns,
    #[error("gap must be a non-negative finite number, got {0}")]
    InvalidGap(f64),
}

/// Dimensions of the key grid.
///
/// Supplied per render by the shell and treated as immutable for the duration
/// of a single interaction. The cell size is a fixed constant; rows, columns
/// and gap come from the shell's controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of grid rows.
    pub rows: u32,
    /// Number of grid columns.
    pub columns: u32,
    /// Spacing between adjacent cells in pixels.
    pub gap: f64,
    /// Edge length of one cell in pixels.
    pub cell_size: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            columns: 12,
            gap: 4.0,
            cell_size: CELL_SIZE,
        }
    }
}

impl GridConfig {
    /// Create a validated configuration.
    pub fn new(rows: u32, columns: u32, gap: f64) -> Result<Self, ConfigError> {
        if rows == 0 {
            return Err(ConfigError::ZeroRows);
        }
        if columns == 0 {
            return Err(ConfigError::ZeroColumns);
        }
        if !gap.is_finite() || gap < 0.0 {
            return Err(ConfigError::InvalidGap(gap));
        }
        Ok(Self {
            rows,
            columns,
            gap,
            cell_size: CELL_SIZE,
        })
    }

    /// Create a configuration with out-of-range values clamped into the
    /// ranges the shell's sliders expose. Never fails; intended for inputs
    /// that originate from interactive controls.
    pub fn clamped(rows: u32, columns: u32, gap: f64) -> Self {
        let gap = if gap.is_finite() { gap } else { 0.0 };
        Self {
            rows: rows.clamp(MIN_ROWS, MAX_ROWS),
            columns: columns.clamp(MIN_COLUMNS, MAX_COLUMNS),
            gap: gap.clamp(0.0, MAX_GAP),
            cell_size: CELL_SIZE,
        }
    }
}
