//! Data models for the annotation engine.

mod cell_type;
mod geometry;
mod marker;
mod roi;

pub use cell_type::{CellType, LabelPosition, MarkerShape, clamp_marker_size, default_cell_types};
pub use geometry::{Point, polygon_contains};
pub use marker::{CellMarker, next_number, renumber};
pub use roi::Roi;
