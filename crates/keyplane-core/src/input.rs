//! Pointer events routed from the shell, and hit-testing of raw pointer
//! positions against the layout.

use crate::config::GridConfig;
use crate::geometry::{self, Cell};
use crate::key::KeyId;
use crate::layout::KeyboardLayout;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Side length of the resize handle hit region at a key's bottom-right
/// corner, in pixels.
pub const RESIZE_HANDLE_SIZE: f64 = 12.0;

/// Side length of the delete control hit region at a key's top-right
/// corner, in pixels.
pub const DELETE_CONTROL_SIZE: f64 = 16.0;

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerTarget {
    /// An unoccupied grid cell: the add affordance.
    EmptyCell(Cell),
    /// The body of a key; starts a drag.
    KeyBody(KeyId),
    /// The resize handle at a key's bottom-right corner.
    ResizeHandle(KeyId),
    /// The delete control at a key's top-right corner.
    DeleteControl(KeyId),
}

/// A pointer event forwarded by the shell.
///
/// Positions are in grid-local pixels (outer padding already subtracted by
/// the shell). Down events carry the classified target; move and up events
/// are only forwarded while an interaction is active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        target: PointerTarget,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
    },
}

/// Classify a raw pointer position against the layout.
///
/// Keys are tested front to back (insertion order is render order, so the
/// latest-added key wins when footprints overlap). Within a key, the delete
/// control takes priority over the resize handle, which takes priority over
/// the body. Positions over no key resolve to the containing cell, or `None`
/// when the position falls in a gap strip or outside the grid entirely.
pub fn classify_point(
    layout: &KeyboardLayout,
    config: &GridConfig,
    position: Point,
) -> Option<PointerTarget> {
    for key in layout.keys().iter().rev() {
        let rect = geometry::footprint_rect(config, key.origin(), key.width, key.height);
        if !rect.contains(position) {
            continue;
        }
        let delete = Rect::new(
            rect.x1 - DELETE_CONTROL_SIZE,
            rect.y0,
            rect.x1,
            rect.y0 + DELETE_CONTROL_SIZE,
        );
        if delete.contains(position) {
            return Some(PointerTarget::DeleteControl(key.id()));
        }
        let handle = Rect::new(
            rect.x1 - RESIZE_HANDLE_SIZE,
            rect.y1 - RESIZE_HANDLE_SIZE,
            rect.x1,
            rect.y1,
        );
        if handle.contains(position) {
            return Some(PointerTarget::ResizeHandle(key.id()));
        }
        return Some(PointerTarget::KeyBody(key.id()));
    }

    let bounds = Rect::from_origin_size(Point::ZERO, geometry::grid_size(config));
    if !bounds.contains(position) {
        return None;
    }
    let cell = geometry::pixel_to_cell(config, position);
    if geometry::cell_rect(config, cell).contains(position) {
        Some(PointerTarget::EmptyCell(cell))
    } else {
        // Between cells, in a gap strip.
        None
    }
}
