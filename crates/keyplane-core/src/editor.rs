//! Placement engine and the pointer-driven drag/resize state machine.

use crate::config::GridConfig;
use crate::geometry::{self, Cell};
use crate::input::{PointerEvent, PointerTarget};
use crate::key::{Key, KeyId};
use crate::layout::KeyboardLayout;
use kurbo::{Point, Vec2};
use std::collections::HashSet;

/// The active pointer interaction. At most one at a time; a new interaction
/// can only start from `Idle`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    /// No interaction in progress.
    Idle,
    /// A key is following the pointer. `grab_offset` is the pointer's offset
    /// from the key's top-left pixel origin at drag start, so the key does
    /// not jump to the cursor.
    Dragging { key: KeyId, grab_offset: Vec2 },
    /// A key's bottom-right extent is following the pointer. The origin is
    /// fixed for the whole resize.
    Resizing { key: KeyId },
}

/// Owns the layout and drives all mutations from classified pointer events.
///
/// Every operation is total: requests that cannot be honored (unknown ids,
/// occupied cells, events in the wrong state) are ignored, and computed
/// coordinates are clamped into the grid rather than rejected. Pointer input
/// is noisy; the editor recovers silently instead of interrupting the user.
#[derive(Debug, Clone)]
pub struct LayoutEditor {
    layout: KeyboardLayout,
    config: GridConfig,
    interaction: Interaction,
}

impl LayoutEditor {
    /// Create an editor over an empty layout.
    pub fn new(config: GridConfig) -> Self {
        Self::with_layout(KeyboardLayout::new(), config)
    }

    /// Create an editor over an existing layout. Keys are clamped into the
    /// grid up front so the bounds invariant holds from the first frame.
    pub fn with_layout(mut layout: KeyboardLayout, config: GridConfig) -> Self {
        layout.clamp_to_grid(&config);
        Self {
            layout,
            config,
            interaction: Interaction::Idle,
        }
    }

    /// The current grid configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Apply a new grid configuration.
    ///
    /// Takes effect immediately. Keys that no longer fit are clamped in
    /// place (shrunk to the grid, slid back inside); none are deleted, and
    /// the bounds invariant holds unconditionally afterwards.
    pub fn set_config(&mut self, config: GridConfig) {
        self.layout.clamp_to_grid(&config);
        self.config = config;
    }

    /// The layout being edited.
    pub fn layout(&self) -> &KeyboardLayout {
        &self.layout
    }

    /// Consume the editor and take the layout.
    pub fn into_layout(self) -> KeyboardLayout {
        self.layout
    }

    /// All keys in insertion order, for rendering.
    pub fn keys(&self) -> &[Key] {
        self.layout.keys()
    }

    /// The set of cells covered by at least one key, for rendering the add
    /// affordance on the remaining cells. Recomputed fresh on every call.
    pub fn occupied_cells(&self) -> HashSet<Cell> {
        self.layout.occupied_cells()
    }

    /// The current interaction state.
    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    /// Whether a drag or resize is in progress. The shell forwards pointer
    /// move/up events only while this is true (scoped listener acquisition).
    pub fn is_interacting(&self) -> bool {
        self.interaction != Interaction::Idle
    }

    /// Place a new 1x1 key at a cell. Ignored if the cell is occupied or
    /// outside the grid.
    pub fn add_key(&mut self, cell: Cell) -> Option<KeyId> {
        let id = self.layout.add_key(cell, &self.config);
        match id {
            Some(id) => log::debug!("added {id} at ({}, {})", cell.col, cell.row),
            None => log::debug!(
                "ignored add at occupied or out-of-bounds cell ({}, {})",
                cell.col,
                cell.row
            ),
        }
        id
    }

    /// Remove a key by id. Ignored if absent. Cancels the active interaction
    /// when it references the removed key, so a stale id is never mutated.
    pub fn remove_key(&mut self, id: KeyId) {
        if self.interaction_key() == Some(id) {
            self.end_interaction();
        }
        match self.layout.remove_key(id) {
            Some(_) => log::debug!("removed {id}"),
            None => log::debug!("ignored remove of unknown {id}"),
        }
    }

    /// Start dragging a key. Ignored unless the key exists and no other
    /// interaction is active.
    pub fn begin_drag(&mut self, id: KeyId, pointer: Point) {
        if self.interaction != Interaction::Idle {
            log::debug!("ignored begin_drag({id}) while interacting");
            return;
        }
        let Some(key) = self.layout.key(id) else {
            log::debug!("ignored begin_drag on unknown {id}");
            return;
        };
        let origin = geometry::cell_origin(&self.config, key.origin());
        self.interaction = Interaction::Dragging {
            key: id,
            grab_offset: pointer - origin,
        };
        log::trace!("drag started on {id}");
    }

    /// Start resizing a key. Ignored unless the key exists and no other
    /// interaction is active.
    pub fn begin_resize(&mut self, id: KeyId) {
        if self.interaction != Interaction::Idle {
            log::debug!("ignored begin_resize({id}) while interacting");
            return;
        }
        if self.layout.key(id).is_none() {
            log::debug!("ignored begin_resize on unknown {id}");
            return;
        }
        self.interaction = Interaction::Resizing { key: id };
        log::trace!("resize started on {id}");
    }

    /// Advance the active interaction to a new pointer position.
    ///
    /// A no-op while idle. If the referenced key was removed out from under
    /// the interaction, the state drops back to idle without touching the
    /// layout.
    pub fn pointer_move(&mut self, pointer: Point) {
        let config = self.config;
        match self.interaction {
            Interaction::Idle => {}
            Interaction::Dragging { key, grab_offset } => {
                let Some(key) = self.layout.key_mut(key) else {
                    self.end_interaction();
                    return;
                };
                // Bias by half a cell so the key snaps once the pointer
                // crosses a cell midpoint.
                let half = config.cell_size / 2.0;
                let target = geometry::pixel_to_cell(
                    &config,
                    pointer - grab_offset + Vec2::new(half, half),
                );
                key.col = target.col.min(config.columns.saturating_sub(key.width));
                key.row = target.row.min(config.rows.saturating_sub(key.height));
            }
            Interaction::Resizing { key } => {
                let Some(key) = self.layout.key_mut(key) else {
                    self.end_interaction();
                    return;
                };
                let origin = geometry::cell_origin(&config, key.origin());
                let (max_width, max_height) = geometry::max_footprint(&config, key.origin());
                key.width = geometry::span_for_distance(&config, pointer.x - origin.x)
                    .min(max_width.max(1));
                key.height = geometry::span_for_distance(&config, pointer.y - origin.y)
                    .min(max_height.max(1));
            }
        }
    }

    /// End the active interaction. Unconditional and idempotent: this is the
    /// only exit from dragging/resizing besides removal of the key.
    pub fn pointer_up(&mut self) {
        self.end_interaction();
    }

    /// Route a classified pointer event to the operation it requests.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, target } => match target {
                PointerTarget::EmptyCell(cell) => {
                    self.add_key(cell);
                }
                PointerTarget::KeyBody(id) => self.begin_drag(id, position),
                PointerTarget::ResizeHandle(id) => self.begin_resize(id),
                PointerTarget::DeleteControl(id) => self.remove_key(id),
            },
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { .. } => self.pointer_up(),
        }
    }

    fn interaction_key(&self) -> Option<KeyId> {
        match self.interaction {
            Interaction::Idle => None,
            Interaction::Dragging { key, .. } | Interaction::Resizing { key } => Some(key),
        }
    }

    // Sole transition back to Idle; every exit path funnels through here so
    // the shell's pointer capture is released on all of them.
    fn end_interaction(&mut self) {
        if self.interaction != Interaction::Idle {
            log::trace!("interaction ended");
        }
        self.interaction = Interaction::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{cell_origin, cell_rect, pitch};

    fn editor() -> LayoutEditor {
        LayoutEditor::new(GridConfig::default()) // 5 rows x 12 columns, gap 4, cell 60
    }

    fn assert_bounds_invariant(editor: &LayoutEditor) {
        let config = editor.config();
        for key in editor.keys() {
            assert!(key.width >= 1 && key.height >= 1);
            assert!(key.col + key.width <= config.columns);
            assert!(key.row + key.height <= config.rows);
        }
    }

    #[test]
    fn test_drag_moves_key_to_pointed_cell() {
        let mut editor = editor();
        let id = editor.add_key(Cell::new(0, 0)).unwrap();

        // Grab the key at its center, move to the center of cell (2, 0).
        let start = cell_rect(editor.config(), Cell::new(0, 0)).center();
        editor.begin_drag(id, start);
        let target = cell_rect(editor.config(), Cell::new(2, 0)).center();
        editor.pointer_move(target);
        editor.pointer_up();

        let key = editor.layout().key(id).unwrap();
        assert_eq!(key.origin(), Cell::new(2, 0));
        assert_eq!((key.width, key.height), (1, 1));
        assert_eq!(editor.interaction(), Interaction::Idle);
    }

    #[test]
    fn test_drag_clamps_to_grid_edges() {
        let mut editor = editor();
        let id = editor.add_key(Cell::new(5, 2)).unwrap();
        let start = cell_rect(editor.config(), Cell::new(5, 2)).center();

        editor.begin_drag(id, start);
        editor.pointer_move(Point::new(-500.0, -500.0));
        assert_eq!(editor.layout().key(id).unwrap().origin(), Cell::new(0, 0));

        editor.pointer_move(Point::new(5000.0, 5000.0));
        assert_eq!(editor.layout().key(id).unwrap().origin(), Cell::new(11, 4));
        assert_bounds_invariant(&editor);
    }

    #[test]
    fn test_drag_clamp_accounts_for_key_size() {
        let mut editor = editor();
        let id = editor.add_key(Cell::new(0, 0)).unwrap();
        editor.begin_resize(id);
        let origin = cell_origin(editor.config(), Cell::new(0, 0));
        let pitch = pitch(editor.config());
        editor.pointer_move(Point::new(origin.x + 2.5 * pitch, origin.y + 1.5 * pitch));
        editor.pointer_up();

        // A 3x2 key dragged far right/down may go no further than (9, 3).
        let grab = cell_rect(editor.config(), Cell::new(0, 0)).center();
        editor.begin_drag(id, grab);
        editor.pointer_move(Point::new(5000.0, 5000.0));

        let key = editor.layout().key(id).unwrap();
        assert_eq!(key.origin(), Cell::new(9, 3));
        assert_bounds_invariant(&editor);
    }

    #[test]
    fn test_drag_keeps_grab_offset() {
        let mut editor = editor();
        let id = editor.add_key(Cell::new(3, 1)).unwrap();

        // Grab near the key's right edge; a small pointer move that stays
        // within the same cell under the grab point must not move the key.
        let rect = cell_rect(editor.config(), Cell::new(3, 1));
        editor.begin_drag(id, Point::new(rect.x1 - 2.0, rect.y1 - 2.0));
        editor.pointer_move(Point::new(rect.x1 + 10.0, rect.y1 - 2.0));

        assert_eq!(editor.layout().key(id).unwrap().origin(), Cell::new(3, 1));
    }

    #[test]
    fn test_resize_rounds_up_to_pointed_cell() {
        let mut editor = editor();
        let id = editor.add_key(Cell::new(1, 1)).unwrap();

        editor.begin_resize(id);
        let origin = cell_origin(editor.config(), Cell::new(1, 1));
        let pitch = pitch(editor.config());
        editor.pointer_move(Point::new(origin.x + 2.5 * pitch, origin.y + 1.5 * pitch));

        let key = editor.layout().key(id).unwrap();
        assert_eq!((key.width, key.height), (3, 2));
        assert_eq!(key.origin(), Cell::new(1, 1));
    }

    #[test]
    fn test_resize_clamps_at_grid_corner() {
        let mut editor = editor();
        let id = editor.add_key(Cell::new(11, 4)).unwrap();

        editor.begin_resize(id);
        editor.pointer_move(Point::new(10_000.0, 10_000.0));

        let key = editor.layout().key(id).unwrap();
        assert_eq!((key.width, key.height), (1, 1));
        assert_bounds_invariant(&editor);
    }

    #[test]
    fn test_resize_never_shrinks_below_one_cell() {
        let mut editor = editor();
        let id = editor.add_key(Cell::new(2, 2)).unwrap();

        editor.begin_resize(id);
        editor.pointer_move(Point::new(-400.0, -400.0));

        let key = editor.layout().key(id).unwrap();
        assert_eq!((key.width, key.height), (1, 1));
    }

    #[test]
    fn test_overlap_during_drag_is_permitted() {
        let mut editor = editor();
        let moving = editor.add_key(Cell::new(0, 0)).unwrap();
        editor.add_key(Cell::new(2, 0));

        let grab = cell_rect(editor.config(), Cell::new(0, 0)).center();
        editor.begin_drag(moving, grab);
        editor.pointer_move(cell_rect(editor.config(), Cell::new(2, 0)).center());

        // Both keys now cover (2, 0); occupancy is a union, not an error.
        assert_eq!(editor.layout().key(moving).unwrap().origin(), Cell::new(2, 0));
        assert_eq!(editor.keys().len(), 2);
        assert!(editor.occupied_cells().contains(&Cell::new(2, 0)));
    }

    #[test]
    fn test_begin_drag_rejected_while_resizing() {
        let mut editor = editor();
        let first = editor.add_key(Cell::new(0, 0)).unwrap();
        let second = editor.add_key(Cell::new(3, 0)).unwrap();

        editor.begin_resize(first);
        let grab = cell_rect(editor.config(), Cell::new(3, 0)).center();
        editor.begin_drag(second, grab);

        assert_eq!(editor.interaction(), Interaction::Resizing { key: first });
    }

    #[test]
    fn test_begin_on_unknown_key_is_noop() {
        let mut editor = editor();
        let id = editor.add_key(Cell::new(0, 0)).unwrap();
        editor.remove_key(id);

        editor.begin_drag(id, Point::new(30.0, 30.0));
        assert_eq!(editor.interaction(), Interaction::Idle);
        editor.begin_resize(id);
        assert_eq!(editor.interaction(), Interaction::Idle);
    }

    #[test]
    fn test_removal_mid_drag_cancels_interaction() {
        let mut editor = editor();
        let id = editor.add_key(Cell::new(0, 0)).unwrap();

        let grab = cell_rect(editor.config(), Cell::new(0, 0)).center();
        editor.begin_drag(id, grab);
        editor.remove_key(id);

        assert_eq!(editor.interaction(), Interaction::Idle);
        // A stray move after the removal must not panic or mutate anything.
        editor.pointer_move(Point::new(200.0, 200.0));
        assert!(editor.layout().is_empty());
    }

    #[test]
    fn test_pointer_up_is_idempotent() {
        let mut editor = editor();
        let id = editor.add_key(Cell::new(0, 0)).unwrap();

        editor.begin_resize(id);
        editor.pointer_up();
        assert_eq!(editor.interaction(), Interaction::Idle);
        editor.pointer_up();
        assert_eq!(editor.interaction(), Interaction::Idle);
        assert_eq!(editor.keys().len(), 1);
    }

    #[test]
    fn test_pointer_move_while_idle_is_noop() {
        let mut editor = editor();
        editor.add_key(Cell::new(1, 1));
        let before = editor.keys().to_vec();

        editor.pointer_move(Point::new(300.0, 100.0));

        assert_eq!(editor.keys(), &before[..]);
        assert_eq!(editor.interaction(), Interaction::Idle);
    }

    #[test]
    fn test_shrinking_config_clamps_keys() {
        let mut editor = editor();
        let id = editor.add_key(Cell::new(11, 4)).unwrap();

        editor.set_config(GridConfig::new(2, 3, 4.0).unwrap());

        let key = editor.layout().key(id).unwrap();
        assert_eq!(key.origin(), Cell::new(2, 1));
        assert_bounds_invariant(&editor);
    }

    #[test]
    fn test_event_routing() {
        let mut editor = editor();
        let config = *editor.config();

        editor.handle_pointer_event(PointerEvent::Down {
            position: cell_rect(&config, Cell::new(0, 0)).center(),
            target: PointerTarget::EmptyCell(Cell::new(0, 0)),
        });
        assert_eq!(editor.keys().len(), 1);
        let id = editor.keys()[0].id();

        let grab = cell_rect(&config, Cell::new(0, 0)).center();
        editor.handle_pointer_event(PointerEvent::Down {
            position: grab,
            target: PointerTarget::KeyBody(id),
        });
        assert!(editor.is_interacting());

        editor.handle_pointer_event(PointerEvent::Move {
            position: cell_rect(&config, Cell::new(4, 2)).center(),
        });
        editor.handle_pointer_event(PointerEvent::Up {
            position: cell_rect(&config, Cell::new(4, 2)).center(),
        });

        assert_eq!(editor.layout().key(id).unwrap().origin(), Cell::new(4, 2));
        assert!(!editor.is_interacting());

        editor.handle_pointer_event(PointerEvent::Down {
            position: Point::ZERO,
            target: PointerTarget::DeleteControl(id),
        });
        assert!(editor.layout().is_empty());
    }
}
