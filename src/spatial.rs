//! Spatial queries: hit testing and marker-to-ROI membership.
//!
//! All lookups scan in list order and return the first match, so earlier
//! markers and earlier-created ROIs win ties.

use crate::model::{CellMarker, Point, Roi};

/// Index of the first marker strictly closer than `threshold` to `point`.
pub fn find_marker_at(markers: &[CellMarker], point: &Point, threshold: f64) -> Option<usize> {
    markers
        .iter()
        .position(|m| m.position.distance_to(point) < threshold)
}

/// First vertex of a closed ROI strictly closer than `threshold` to `point`.
///
/// Returns `(roi_index, vertex_index)`.
pub fn find_roi_vertex_at(rois: &[Roi], point: &Point, threshold: f64) -> Option<(usize, usize)> {
    rois.iter()
        .enumerate()
        .filter(|(_, roi)| roi.closed)
        .find_map(|(roi_idx, roi)| {
            roi.points
                .iter()
                .position(|v| v.distance_to(point) < threshold)
                .map(|vertex_idx| (roi_idx, vertex_idx))
        })
}

/// Index of the first closed ROI whose interior contains `point`.
pub fn find_roi_at(rois: &[Roi], point: &Point) -> Option<usize> {
    rois.iter().position(|roi| roi.contains(point))
}

/// Name of the ROI a marker at `point` belongs to.
///
/// Overlapping ROIs resolve to the earliest created one.
pub fn resolve_membership<'a>(rois: &'a [Roi], point: &Point) -> Option<&'a str> {
    find_roi_at(rois, point).map(|idx| rois[idx].name.as_str())
}

/// Re-resolve membership for every marker. Returns how many changed.
pub fn refresh_membership(markers: &mut [CellMarker], rois: &[Roi]) -> usize {
    let mut changed = 0;
    for marker in markers.iter_mut() {
        let resolved = resolve_membership(rois, &marker.position);
        if marker.roi_name.as_deref() != resolved {
            marker.roi_name = resolved.map(str::to_string);
            changed += 1;
        }
    }
    changed
}
