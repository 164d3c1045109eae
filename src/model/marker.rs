//! Cell markers: one counted cell each.

use super::geometry::Point;

/// A single tagged point annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct CellMarker {
    /// Position in image coordinates.
    pub position: Point,
    /// Name of the owning cell type.
    pub cell_type: String,
    /// 1-based number, dense within `cell_type`.
    pub marker_number: u32,
    /// Name of the enclosing closed ROI, if any.
    pub roi_name: Option<String>,
}

impl CellMarker {
    pub fn new(position: Point, cell_type: impl Into<String>, marker_number: u32) -> Self {
        Self {
            position,
            cell_type: cell_type.into(),
            marker_number,
            roi_name: None,
        }
    }
}

/// Renumber every marker of `cell_type` to 1..=N in list order.
pub fn renumber(markers: &mut [CellMarker], cell_type: &str) {
    let mut next = 1;
    for marker in markers.iter_mut().filter(|m| m.cell_type == cell_type) {
        marker.marker_number = next;
        next += 1;
    }
}

/// Next free number for a marker appended to `cell_type`.
pub fn next_number(markers: &[CellMarker], cell_type: &str) -> u32 {
    markers.iter().filter(|m| m.cell_type == cell_type).count() as u32 + 1
}
