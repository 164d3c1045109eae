//! Deleted-marker history.
//!
//! Deleting a marker moves the record out of the session's live marker list
//! onto this stack; restoring moves it back. Only marker deletion is covered,
//! and most other mutations clear the stack.

use crate::model::CellMarker;

#[derive(Debug, Clone, Default)]
pub struct MarkerHistory {
    /// Deleted markers, most recent last.
    deleted: Vec<CellMarker>,
}

impl MarkerHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a deleted marker.
    pub fn push(&mut self, marker: CellMarker) {
        log::debug!(
            "📝 History: deleted {} #{}",
            marker.cell_type,
            marker.marker_number
        );
        self.deleted.push(marker);
    }

    /// Take the most recently deleted marker back out.
    pub fn pop(&mut self) -> Option<CellMarker> {
        let marker = self.deleted.pop()?;
        log::debug!(
            "⏩ History: restoring {} #{}",
            marker.cell_type,
            marker.marker_number
        );
        Some(marker)
    }

    /// Most recently deleted marker, if any.
    pub fn peek(&self) -> Option<&CellMarker> {
        self.deleted.last()
    }

    pub fn can_restore(&self) -> bool {
        !self.deleted.is_empty()
    }

    pub fn len(&self) -> usize {
        self.deleted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty()
    }

    pub fn clear(&mut self) {
        if self.deleted.is_empty() {
            return;
        }
        self.deleted.clear();
        log::debug!("🗑️ Marker history cleared");
    }
}
