//! Cell type definitions and the active type.

use super::Session;
use crate::color_utils::Rgb;
use crate::error::{EngineError, EngineResult, EntityKind};
use crate::model::{CellType, LabelPosition, MarkerShape, clamp_marker_size};

impl Session {
    /// Define a new cell type and make it the active one.
    pub fn add_cell_type(&mut self, cell_type: CellType) -> EngineResult<()> {
        let name = cell_type.name.trim().to_string();
        self.check_cell_type_name_free(&name)?;

        let size = cell_type.marker_size;
        let mut cell_type = cell_type.with_size(size);
        cell_type.name = name.clone();
        cell_type.count = 0;
        log::debug!("Added cell type '{name}'");
        self.cell_types.push(cell_type);
        self.current_cell_type = Some(name);
        Ok(())
    }

    /// Rename a cell type. Markers and the active type follow the new name.
    ///
    /// Clears the deleted-marker history.
    pub fn rename_cell_type(&mut self, old_name: &str, new_name: &str) -> EngineResult<()> {
        let new_name = new_name.trim();
        let idx = self.cell_type_index(old_name)?;
        if old_name == new_name {
            return Ok(());
        }
        self.check_cell_type_name_free(new_name)?;

        self.cell_types[idx].name = new_name.to_string();
        for marker in self.markers.iter_mut().filter(|m| m.cell_type == old_name) {
            marker.cell_type = new_name.to_string();
        }
        if self.current_cell_type.as_deref() == Some(old_name) {
            self.current_cell_type = Some(new_name.to_string());
        }
        self.history.clear();
        log::debug!("Renamed cell type '{old_name}' -> '{new_name}'");
        Ok(())
    }

    /// Delete a cell type together with all of its markers.
    ///
    /// The last remaining cell type cannot be deleted. If the deleted type
    /// was active, the first remaining type becomes active.
    pub fn delete_cell_type(&mut self, name: &str) -> EngineResult<()> {
        let idx = self.cell_type_index(name)?;
        if self.cell_types.len() <= 1 {
            return Err(EngineError::LastCellType);
        }

        self.cell_types.remove(idx);
        let before = self.markers.len();
        self.markers.retain(|m| m.cell_type != name);
        let removed = before - self.markers.len();

        if self.current_cell_type.as_deref() == Some(name) {
            self.current_cell_type = self.cell_types.first().map(|c| c.name.clone());
        }
        if removed > 0 {
            self.selected_marker = None;
        }
        self.history.clear();
        self.refresh_counts();
        log::debug!("Deleted cell type '{name}' and {removed} marker(s)");
        Ok(())
    }

    pub fn set_cell_type_color(&mut self, name: &str, color: Rgb) -> EngineResult<()> {
        let idx = self.cell_type_index(name)?;
        self.cell_types[idx].color = color;
        Ok(())
    }

    pub fn set_cell_type_shape(&mut self, name: &str, shape: MarkerShape) -> EngineResult<()> {
        let idx = self.cell_type_index(name)?;
        self.cell_types[idx].marker_shape = shape;
        Ok(())
    }

    /// Set the marker size, clamped to 5..=100. Returns the stored size.
    pub fn set_cell_type_size(&mut self, name: &str, size: u32) -> EngineResult<u32> {
        let idx = self.cell_type_index(name)?;
        let size = clamp_marker_size(size);
        self.cell_types[idx].marker_size = size;
        Ok(size)
    }

    pub fn set_cell_type_label_position(
        &mut self,
        name: &str,
        position: LabelPosition,
    ) -> EngineResult<()> {
        let idx = self.cell_type_index(name)?;
        self.cell_types[idx].label_position = position;
        Ok(())
    }

    /// Make `name` the type given to new markers.
    pub fn set_current_cell_type(&mut self, name: &str) -> EngineResult<()> {
        self.cell_type_index(name)?;
        self.current_cell_type = Some(name.to_string());
        Ok(())
    }

    /// Advance the active type in definition order, wrapping around.
    pub fn cycle_current_cell_type(&mut self) -> Option<&str> {
        let next = match self
            .current_cell_type
            .as_deref()
            .and_then(|name| self.cell_types.iter().position(|c| c.name == name))
        {
            Some(idx) => (idx + 1) % self.cell_types.len(),
            None => 0,
        };
        self.current_cell_type = self.cell_types.get(next).map(|c| c.name.clone());
        self.current_cell_type.as_deref()
    }

    fn cell_type_index(&self, name: &str) -> EngineResult<usize> {
        self.cell_types
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| EngineError::not_found(EntityKind::CellType, name))
    }

    fn check_cell_type_name_free(&self, name: &str) -> EngineResult<()> {
        if name.is_empty() {
            return Err(EngineError::EmptyName {
                kind: EntityKind::CellType,
            });
        }
        if self.cell_type(name).is_some() {
            return Err(EngineError::conflict(EntityKind::CellType, name));
        }
        Ok(())
    }
}
