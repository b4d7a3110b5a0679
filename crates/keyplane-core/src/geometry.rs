//! Stateless conversion between grid cells and pixel coordinates.

use crate::config::GridConfig;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// One grid unit, addressed by integer (column, row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub col: u32,
    pub row: u32,
}

impl Cell {
    /// Create a new cell address.
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

/// The stride between adjacent cell origins: cell size plus gap.
pub fn pitch(config: &GridConfig) -> f64 {
    config.cell_size + config.gap
}

/// Pixel position of a cell's top-left corner, relative to the grid origin.
///
/// Outer padding is applied uniformly by the rendering caller, so the grid
/// origin here is always (0, 0).
pub fn cell_origin(config: &GridConfig, cell: Cell) -> Point {
    let pitch = pitch(config);
    Point::new(cell.col as f64 * pitch, cell.row as f64 * pitch)
}

/// Pixel size of a footprint spanning `width` x `height` cells.
///
/// Interior gaps are included, so adjacent full-size keys touch with exactly
/// `gap` spacing and a multi-cell key's far edge aligns with the far edge of
/// the last covered cell.
pub fn footprint_size(config: &GridConfig, width: u32, height: u32) -> Size {
    let w = width.max(1) as f64;
    let h = height.max(1) as f64;
    Size::new(
        w * config.cell_size + (w - 1.0) * config.gap,
        h * config.cell_size + (h - 1.0) * config.gap,
    )
}

/// Pixel rectangle covered by a footprint anchored at `origin`.
pub fn footprint_rect(config: &GridConfig, origin: Cell, width: u32, height: u32) -> Rect {
    Rect::from_origin_size(cell_origin(config, origin), footprint_size(config, width, height))
}

/// Pixel rectangle of a single cell.
pub fn cell_rect(config: &GridConfig, cell: Cell) -> Rect {
    Rect::from_origin_size(
        cell_origin(config, cell),
        Size::new(config.cell_size, config.cell_size),
    )
}

/// Total pixel size of the grid, gaps included.
pub fn grid_size(config: &GridConfig) -> Size {
    footprint_size(config, config.columns, config.rows)
}

/// Map a pixel position back to the cell containing it.
///
/// Positions outside the grid clamp to the nearest valid cell rather than
/// being rejected; pointer input is noisy and the caller expects a total
/// function. Center-biased rounding for drags is achieved by the caller
/// offsetting the position by half a cell before conversion.
pub fn pixel_to_cell(config: &GridConfig, position: Point) -> Cell {
    let pitch = pitch(config);
    let col = (position.x / pitch).floor().max(0.0) as u32;
    let row = (position.y / pitch).floor().max(0.0) as u32;
    Cell::new(
        col.min(config.columns.saturating_sub(1)),
        row.min(config.rows.saturating_sub(1)),
    )
}

/// Number of cells a pixel distance from a footprint's origin spans,
/// rounded up and floored at one cell. Used to derive a key's size while
/// its resize handle follows the pointer.
pub fn span_for_distance(config: &GridConfig, distance: f64) -> u32 {
    let cells = (distance / pitch(config)).ceil();
    if cells >= 1.0 { cells as u32 } else { 1 }
}

/// Largest footprint a key anchored at `origin` may grow to without
/// crossing the grid boundary, as (width, height).
pub fn max_footprint(config: &GridConfig, origin: Cell) -> (u32, u32) {
    (
        config.columns.saturating_sub(origin.col),
        config.rows.saturating_sub(origin.row),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GridConfig {
        GridConfig::default() // 5 rows x 12 columns, gap 4, cell 60
    }

    #[test]
    fn test_cell_origin() {
        let origin = cell_origin(&config(), Cell::new(2, 1));
        assert!((origin.x - 128.0).abs() < f64::EPSILON);
        assert!((origin.y - 64.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_footprint_size_includes_interior_gaps() {
        let size = footprint_size(&config(), 3, 2);
        assert!((size.width - (3.0 * 60.0 + 2.0 * 4.0)).abs() < f64::EPSILON);
        assert!((size.height - (2.0 * 60.0 + 4.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_footprint_far_edge_matches_last_cell() {
        let config = config();
        let rect = footprint_rect(&config, Cell::new(1, 1), 3, 2);
        let last = cell_rect(&config, Cell::new(3, 2));
        assert!((rect.x1 - last.x1).abs() < f64::EPSILON);
        assert!((rect.y1 - last.y1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pixel_to_cell_roundtrip() {
        let config = config();
        for cell in [Cell::new(0, 0), Cell::new(3, 2), Cell::new(11, 4)] {
            let origin = cell_origin(&config, cell);
            assert_eq!(pixel_to_cell(&config, origin), cell);
        }
    }

    #[test]
    fn test_pixel_to_cell_clamps_outside_grid() {
        let config = config();
        assert_eq!(pixel_to_cell(&config, Point::new(-50.0, -50.0)), Cell::new(0, 0));
        assert_eq!(
            pixel_to_cell(&config, Point::new(10_000.0, 10_000.0)),
            Cell::new(11, 4)
        );
    }

    #[test]
    fn test_span_for_distance_rounds_up() {
        let config = config();
        let pitch = pitch(&config);
        assert_eq!(span_for_distance(&config, 0.0), 1);
        assert_eq!(span_for_distance(&config, -100.0), 1);
        assert_eq!(span_for_distance(&config, pitch), 1);
        assert_eq!(span_for_distance(&config, pitch + 0.1), 2);
        assert_eq!(span_for_distance(&config, 2.5 * pitch), 3);
    }

    #[test]
    fn test_max_footprint() {
        let config = config();
        assert_eq!(max_footprint(&config, Cell::new(0, 0)), (12, 5));
        assert_eq!(max_footprint(&config, Cell::new(11, 4)), (1, 1));
    }

    #[test]
    fn test_grid_size() {
        let size = grid_size(&config());
        assert!((size.width - (12.0 * 60.0 + 11.0 * 4.0)).abs() < f64::EPSILON);
        assert!((size.height - (5.0 * 60.0 + 4.0 * 4.0)).abs() < f64::EPSILON);
    }
}
