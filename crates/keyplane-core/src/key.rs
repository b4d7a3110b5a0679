//! Key data model.

use crate::geometry::Cell;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label given to newly placed keys.
pub const DEFAULT_LABEL: &str = "Key";

/// Opaque identifier for a key, unique for the lifetime of its layout.
///
/// Allocated from a monotonic per-layout counter, so uniqueness does not
/// depend on timing resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyId(u64);

impl KeyId {
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key-{}", self.0)
    }
}

/// A key placed on the grid.
///
/// Origin and size are in whole cells. Invariants maintained by the editor:
/// the footprint never extends past the grid boundary, and width/height are
/// at least one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Key {
    pub(crate) id: KeyId,
    /// Leftmost column covered by the key.
    pub col: u32,
    /// Topmost row covered by the key.
    pub row: u32,
    /// Width in cells, at least 1.
    pub width: u32,
    /// Height in cells, at least 1.
    pub height: u32,
    /// Display label.
    pub label: String,
}

impl Key {
    /// Create a 1x1 key with the default label.
    pub(crate) fn new(id: KeyId, cell: Cell) -> Self {
        Self {
            id,
            col: cell.col,
            row: cell.row,
            width: 1,
            height: 1,
            label: DEFAULT_LABEL.to_string(),
        }
    }

    /// Get the key's identifier.
    pub fn id(&self) -> KeyId {
        self.id
    }

    /// The cell at the key's top-left corner.
    pub fn origin(&self) -> Cell {
        Cell::new(self.col, self.row)
    }

    /// Check whether the key's footprint covers a cell.
    pub fn covers(&self, cell: Cell) -> bool {
        cell.col >= self.col
            && cell.col < self.col + self.width
            && cell.row >= self.row
            && cell.row < self.row + self.height
    }

    /// Iterate over every cell the key's footprint covers.
    pub fn footprint(&self) -> impl Iterator<Item = Cell> + '_ {
        let cols = self.col..self.col + self.width;
        cols.flat_map(move |col| (self.row..self.row + self.height).map(move |row| Cell::new(col, row)))
    }
}
