//! Keyboard layout document: the ordered key collection and its derived
//! occupancy.

use crate::config::GridConfig;
use crate::geometry::Cell;
use crate::key::{Key, KeyId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// A keyboard layout being edited.
///
/// Keys are kept in insertion order (creation order), which also decides
/// render order: later keys paint on top when footprints overlap. The
/// layout owns the id counter; ids are never reused within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyboardLayout {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    keys: Vec<Key>,
    next_key_id: u64,
}

impl Default for KeyboardLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboardLayout {
    /// Create a new empty layout.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            keys: Vec::new(),
            next_key_id: 0,
        }
    }

    fn allocate_id(&mut self) -> KeyId {
        let id = KeyId::from_raw(self.next_key_id);
        self.next_key_id += 1;
        id
    }

    /// Place a new 1x1 key at a cell.
    ///
    /// Returns `None` without modifying the layout when the cell is outside
    /// the grid or already covered by some key's footprint.
    pub fn add_key(&mut self, cell: Cell, config: &GridConfig) -> Option<KeyId> {
        if cell.col >= config.columns || cell.row >= config.rows {
            return None;
        }
        if self.is_occupied(cell) {
            return None;
        }
        let id = self.allocate_id();
        self.keys.push(Key::new(id, cell));
        Some(id)
    }

    /// Remove a key by id. Returns the removed key, or `None` if absent.
    pub fn remove_key(&mut self, id: KeyId) -> Option<Key> {
        let index = self.keys.iter().position(|key| key.id() == id)?;
        Some(self.keys.remove(index))
    }

    /// Get a key by id.
    pub fn key(&self, id: KeyId) -> Option<&Key> {
        self.keys.iter().find(|key| key.id() == id)
    }

    /// Get a mutable reference to a key by id.
    pub fn key_mut(&mut self, id: KeyId) -> Option<&mut Key> {
        self.keys.iter_mut().find(|key| key.id() == id)
    }

    /// All keys in insertion order.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Number of keys in the layout.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if the layout has no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The set of cells covered by at least one key's footprint.
    ///
    /// Recomputed from the key collection on every call; never cached, so it
    /// cannot go stale. Grids are small (at most 10x15).
    pub fn occupied_cells(&self) -> HashSet<Cell> {
        self.keys.iter().flat_map(Key::footprint).collect()
    }

    /// Check whether any key's footprint covers a cell.
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.keys.iter().any(|key| key.covers(cell))
    }

    /// Clamp every key into the given grid.
    ///
    /// Applied when the configuration changes: a key larger than the new grid
    /// shrinks (never below 1x1), and a key whose footprint hangs past the
    /// boundary slides back in. No key is deleted.
    pub fn clamp_to_grid(&mut self, config: &GridConfig) {
        let columns = config.columns.max(1);
        let rows = config.rows.max(1);
        for key in &mut self.keys {
            key.width = key.width.clamp(1, columns);
            key.height = key.height.clamp(1, rows);
            key.col = key.col.min(columns - key.width);
            key.row = key.row.min(rows - key.height);
        }
    }

    /// Serialize the layout to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a layout from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
