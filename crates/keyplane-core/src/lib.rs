//! Keyplane Core Library
//!
//! Platform-agnostic grid model and interaction engine for the Keyplane
//! keyboard layout editor.

pub mod config;
pub mod editor;
pub mod geometry;
pub mod input;
pub mod key;
pub mod layout;

pub use config::{CELL_SIZE, ConfigError, GRID_PADDING, GridConfig};
pub use editor::{Interaction, LayoutEditor};
pub use geometry::Cell;
pub use input::{PointerEvent, PointerTarget, classify_point};
pub use key::{Key, KeyId};
pub use layout::KeyboardLayout;
