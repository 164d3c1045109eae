//! Marker placement, selection, deletion and restore.

use super::Session;
use crate::error::{EngineError, EngineResult, EntityKind};
use crate::model::{CellMarker, Point, next_number, renumber};
use crate::spatial;

impl Session {
    /// Place a marker of the active cell type. Returns its index.
    ///
    /// Clears the deleted-marker history.
    pub fn add_marker(&mut self, position: Point) -> EngineResult<usize> {
        let cell_type = self
            .current_cell_type
            .as_deref()
            .filter(|name| self.cell_type(name).is_some())
            .ok_or(EngineError::NoActiveCellType)?
            .to_string();

        self.history.clear();
        let number = next_number(&self.markers, &cell_type);
        let mut marker = CellMarker::new(position, cell_type, number);
        marker.roi_name = spatial::resolve_membership(&self.rois, &position).map(str::to_string);
        log::debug!(
            "Added {} #{} at ({:.1}, {:.1}) in {:?}",
            marker.cell_type,
            marker.marker_number,
            position.x,
            position.y,
            marker.roi_name
        );
        self.markers.push(marker);
        self.refresh_counts();
        Ok(self.markers.len() - 1)
    }

    /// Move a marker. Its number is kept and its ROI re-resolved.
    pub fn move_marker(&mut self, index: usize, position: Point) -> EngineResult<()> {
        self.check_marker_index(index)?;
        let roi_name = spatial::resolve_membership(&self.rois, &position).map(str::to_string);
        let marker = &mut self.markers[index];
        marker.position = position;
        marker.roi_name = roi_name;
        Ok(())
    }

    /// Select a marker for deletion, or clear the selection.
    pub fn select_marker(&mut self, index: Option<usize>) -> EngineResult<()> {
        if let Some(idx) = index {
            self.check_marker_index(idx)?;
        }
        self.selected_marker = index;
        Ok(())
    }

    /// Delete the marker at `index`.
    ///
    /// The marker goes onto the deleted-marker history and the rest of its
    /// cell type is renumbered densely in list order.
    pub fn delete_marker(&mut self, index: usize) -> EngineResult<CellMarker> {
        self.check_marker_index(index)?;
        let marker = self.markers.remove(index);
        renumber(&mut self.markers, &marker.cell_type);
        self.history.push(marker.clone());
        self.selected_marker = None;
        self.refresh_counts();
        Ok(marker)
    }

    /// Delete the selected marker, if any.
    pub fn delete_selected_marker(&mut self) -> EngineResult<Option<CellMarker>> {
        match self.selected_marker {
            Some(idx) => self.delete_marker(idx).map(Some),
            None => Ok(None),
        }
    }

    /// Delete the most recently placed marker.
    pub fn undo_last_marker(&mut self) -> Option<CellMarker> {
        let last = self.markers.len().checked_sub(1)?;
        self.delete_marker(last).ok()
    }

    /// Bring back the most recently deleted marker.
    ///
    /// It is appended with a fresh number for its cell type and its ROI is
    /// resolved from the current geometry.
    pub fn restore_marker(&mut self) -> Option<&CellMarker> {
        let mut marker = self.history.pop()?;
        if self.cell_type(&marker.cell_type).is_none() {
            log::warn!(
                "Dropping deleted marker of removed cell type '{}'",
                marker.cell_type
            );
            return None;
        }
        marker.marker_number = next_number(&self.markers, &marker.cell_type);
        marker.roi_name =
            spatial::resolve_membership(&self.rois, &marker.position).map(str::to_string);
        self.markers.push(marker);
        self.selected_marker = None;
        self.refresh_counts();
        self.markers.last()
    }

    /// Remove every marker. Clears the deleted-marker history.
    pub fn clear_markers(&mut self) {
        let removed = self.markers.len();
        self.markers.clear();
        self.history.clear();
        self.selected_marker = None;
        self.refresh_counts();
        log::debug!("Cleared {removed} marker(s)");
    }

    fn check_marker_index(&self, index: usize) -> EngineResult<()> {
        if index >= self.markers.len() {
            return Err(EngineError::IndexOutOfRange {
                kind: EntityKind::Marker,
                index,
                len: self.markers.len(),
            });
        }
        Ok(())
    }
}
