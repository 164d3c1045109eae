//! ROI drawing and editing.
//!
//! Drawing follows `NONE -> DRAWING -> (CLOSED | CANCELLED)`. Only one ROI
//! can be drawn at a time, and only closed ROIs take part in membership.

use super::Session;
use crate::color_utils::Rgb;
use crate::constants::MIN_ROI_POINTS;
use crate::error::{EngineError, EngineResult, EntityKind};
use crate::model::{Point, Roi};

impl Session {
    /// Begin drawing a new ROI with the configured default style.
    pub fn start_roi(&mut self, name: &str) -> EngineResult<()> {
        if let Some(roi) = &self.drawing {
            return Err(EngineError::AlreadyDrawing {
                name: roi.name.clone(),
            });
        }
        let name = name.trim();
        self.check_roi_name_free(name)?;

        let roi = Roi::new(name).with_style(
            self.config.default_roi_color,
            self.config.default_roi_line_width,
        );
        log::debug!("Drawing ROI '{name}'");
        self.drawing = Some(roi);
        Ok(())
    }

    /// Append a vertex to the ROI being drawn. Returns its point count.
    pub fn add_roi_point(&mut self, point: Point) -> EngineResult<usize> {
        let roi = self.drawing.as_mut().ok_or(EngineError::NotDrawing)?;
        roi.points.push(point);
        Ok(roi.points.len())
    }

    /// Close the ROI being drawn and re-resolve all marker membership.
    ///
    /// With fewer than three points the ROI stays open.
    pub fn close_roi(&mut self) -> EngineResult<()> {
        let found = self
            .drawing
            .as_ref()
            .ok_or(EngineError::NotDrawing)?
            .points
            .len();
        if found < MIN_ROI_POINTS {
            return Err(EngineError::TooFewPoints {
                required: MIN_ROI_POINTS,
                found,
            });
        }
        let Some(mut roi) = self.drawing.take() else {
            return Err(EngineError::NotDrawing);
        };
        roi.closed = true;
        log::debug!("Closed ROI '{}' with {found} points", roi.name);
        self.rois.push(roi);
        self.refresh_membership();
        Ok(())
    }

    /// Discard the ROI being drawn.
    pub fn cancel_roi(&mut self) -> EngineResult<()> {
        let roi = self.drawing.take().ok_or(EngineError::NotDrawing)?;
        log::debug!("Cancelled ROI '{}'", roi.name);
        Ok(())
    }

    /// Delete a closed ROI. Markers inside it lose their membership but
    /// are kept.
    pub fn delete_roi(&mut self, name: &str) -> EngineResult<()> {
        let idx = self.roi_index(name)?;
        self.rois.remove(idx);
        let mut orphaned = 0;
        for marker in self
            .markers
            .iter_mut()
            .filter(|m| m.roi_name.as_deref() == Some(name))
        {
            marker.roi_name = None;
            orphaned += 1;
        }
        log::debug!("Deleted ROI '{name}', {orphaned} marker(s) now unassigned");
        Ok(())
    }

    /// Rename a closed ROI. Markers follow the new name.
    pub fn rename_roi(&mut self, old_name: &str, new_name: &str) -> EngineResult<()> {
        let new_name = new_name.trim();
        let idx = self.roi_index(old_name)?;
        if old_name == new_name {
            return Ok(());
        }
        self.check_roi_name_free(new_name)?;

        self.rois[idx].name = new_name.to_string();
        for marker in self
            .markers
            .iter_mut()
            .filter(|m| m.roi_name.as_deref() == Some(old_name))
        {
            marker.roi_name = Some(new_name.to_string());
        }
        log::debug!("Renamed ROI '{old_name}' -> '{new_name}'");
        Ok(())
    }

    pub fn set_roi_color(&mut self, name: &str, color: Rgb) -> EngineResult<()> {
        let idx = self.roi_index(name)?;
        self.rois[idx].color = color;
        Ok(())
    }

    /// Set the outline width (at least 1). Returns the stored width.
    pub fn set_roi_line_width(&mut self, name: &str, width: u32) -> EngineResult<u32> {
        let idx = self.roi_index(name)?;
        let width = width.max(1);
        self.rois[idx].line_width = width;
        Ok(width)
    }

    /// Move one vertex of a closed ROI and re-resolve membership.
    pub fn move_roi_vertex(
        &mut self,
        roi_index: usize,
        vertex_index: usize,
        position: Point,
    ) -> EngineResult<()> {
        self.check_roi_index(roi_index)?;
        let points = &mut self.rois[roi_index].points;
        let len = points.len();
        let vertex = points
            .get_mut(vertex_index)
            .ok_or(EngineError::IndexOutOfRange {
                kind: EntityKind::Roi,
                index: vertex_index,
                len,
            })?;
        *vertex = position;
        self.refresh_membership();
        Ok(())
    }

    /// Translate a whole closed ROI and re-resolve membership.
    pub fn move_roi(&mut self, roi_index: usize, delta: Point) -> EngineResult<()> {
        self.check_roi_index(roi_index)?;
        self.rois[roi_index].translate(delta);
        self.refresh_membership();
        Ok(())
    }

    fn roi_index(&self, name: &str) -> EngineResult<usize> {
        self.rois
            .iter()
            .position(|r| r.name == name)
            .ok_or_else(|| EngineError::not_found(EntityKind::Roi, name))
    }

    fn check_roi_index(&self, index: usize) -> EngineResult<()> {
        if index >= self.rois.len() {
            return Err(EngineError::IndexOutOfRange {
                kind: EntityKind::Roi,
                index,
                len: self.rois.len(),
            });
        }
        Ok(())
    }

    /// ROI names must be unique among closed ROIs and the one being drawn.
    fn check_roi_name_free(&self, name: &str) -> EngineResult<()> {
        if name.is_empty() {
            return Err(EngineError::EmptyName {
                kind: EntityKind::Roi,
            });
        }
        let in_drawing = self.drawing.as_ref().is_some_and(|r| r.name == name);
        if in_drawing || self.roi(name).is_some() {
            return Err(EngineError::conflict(EntityKind::Roi, name));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{EngineError, EntityKind};
    use crate::model::Point;
    use crate::session::Session;
    use crate::session::test_support::*;

    fn roi_names(session: &Session) -> Vec<Option<&str>> {
        session
            .markers()
            .iter()
            .map(|m| m.roi_name.as_deref())
            .collect()
    }

    #[test]
    fn test_drawing_state_machine() {
        let mut session = Session::new();
        assert_eq!(session.add_roi_point(Point::new(0.0, 0.0)), Err(EngineError::NotDrawing));
        assert_eq!(session.close_roi(), Err(EngineError::NotDrawing));
        assert_eq!(session.cancel_roi(), Err(EngineError::NotDrawing));

        session.start_roi("A").unwrap();
        assert!(matches!(
            session.start_roi("B"),
            Err(EngineError::AlreadyDrawing { .. })
        ));
        assert_eq!(session.add_roi_point(Point::new(0.0, 0.0)), Ok(1));
        assert_eq!(session.add_roi_point(Point::new(10.0, 0.0)), Ok(2));
        assert_eq!(
            session.close_roi(),
            Err(EngineError::TooFewPoints {
                required: 3,
                found: 2
            })
        );
        assert!(session.is_drawing());
        assert!(session.rois().is_empty());

        session.add_roi_point(Point::new(0.0, 10.0)).unwrap();
        session.close_roi().unwrap();
        assert!(!session.is_drawing());
        assert_eq!(session.rois().len(), 1);
        assert!(session.rois()[0].closed);
        assert_eq!(session.rois()[0].color, [255, 255, 0]);
        assert_eq!(session.rois()[0].line_width, 2);
    }

    #[test]
    fn test_cancel_discards() {
        let mut session = Session::new();
        session.start_roi("A").unwrap();
        for p in [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)] {
            session.add_roi_point(Point::from(p)).unwrap();
        }
        session.cancel_roi().unwrap();
        assert!(session.rois().is_empty());
        assert!(session.drawing_roi().is_none());
        session.start_roi("A").unwrap();
    }

    #[test]
    fn test_duplicate_roi_name_rejected() {
        let mut session = Session::new();
        square(&mut session, "A", 0.0, 0.0, 10.0);
        assert_eq!(
            session.start_roi(" A "),
            Err(EngineError::conflict(EntityKind::Roi, "A"))
        );
        assert!(matches!(session.start_roi(""), Err(EngineError::EmptyName { .. })));
        assert!(!session.is_drawing());
    }

    #[test]
    fn test_close_assigns_existing_markers() {
        let mut session = Session::new();
        mark(&mut session, "Type 1", 5.0, 5.0);
        mark(&mut session, "Type 1", 50.0, 5.0);
        assert_eq!(roi_names(&session), vec![None, None]);
        square(&mut session, "A", 0.0, 0.0, 10.0);
        assert_eq!(roi_names(&session), vec![Some("A"), None]);
    }

    #[test]
    fn test_delete_roi_unassigns_without_deleting() {
        let mut session = Session::new();
        square(&mut session, "R", 0.0, 0.0, 10.0);
        square(&mut session, "S", 20.0, 0.0, 10.0);
        mark(&mut session, "Type 1", 5.0, 5.0);
        mark(&mut session, "Type 2", 6.0, 6.0);
        mark(&mut session, "Type 1", 25.0, 5.0);

        session.delete_roi("R").unwrap();
        assert_eq!(session.markers().len(), 3);
        assert_eq!(roi_names(&session), vec![None, None, Some("S")]);
        assert_eq!(
            session.delete_roi("R"),
            Err(EngineError::not_found(EntityKind::Roi, "R"))
        );
    }

    #[test]
    fn test_rename_roi_cascades() {
        let mut session = Session::new();
        square(&mut session, "A", 0.0, 0.0, 10.0);
        square(&mut session, "B", 20.0, 0.0, 10.0);
        mark(&mut session, "Type 1", 5.0, 5.0);

        assert_eq!(
            session.rename_roi("A", "B"),
            Err(EngineError::conflict(EntityKind::Roi, "B"))
        );
        assert_eq!(roi_names(&session), vec![Some("A")]);

        session.rename_roi("A", "Cortex").unwrap();
        assert_eq!(roi_names(&session), vec![Some("Cortex")]);
        assert!(session.roi("Cortex").is_some());
        assert!(session.roi("A").is_none());
    }

    #[test]
    fn test_rename_cannot_take_drawing_name() {
        let mut session = Session::new();
        square(&mut session, "A", 0.0, 0.0, 10.0);
        session.start_roi("B").unwrap();
        assert!(session.rename_roi("A", "B").is_err());
    }

    #[test]
    fn test_style_setters() {
        let mut session = Session::new();
        square(&mut session, "A", 0.0, 0.0, 10.0);
        session.set_roi_color("A", [0, 128, 255]).unwrap();
        assert_eq!(session.set_roi_line_width("A", 0), Ok(1));
        assert_eq!(session.roi("A").map(|r| r.color), Some([0, 128, 255]));
        assert!(session.set_roi_color("Z", [0, 0, 0]).is_err());
    }

    #[test]
    fn test_geometry_edits_refresh_membership() {
        let mut session = Session::new();
        square(&mut session, "A", 0.0, 0.0, 10.0);
        mark(&mut session, "Type 1", 15.0, 5.0);
        mark(&mut session, "Type 1", 5.0, 5.0);
        assert_eq!(roi_names(&session), vec![None, Some("A")]);

        // Stretch the right edge past the first marker.
        session.move_roi_vertex(0, 1, Point::new(20.0, 0.0)).unwrap();
        session.move_roi_vertex(0, 2, Point::new(20.0, 10.0)).unwrap();
        assert_eq!(roi_names(&session), vec![Some("A"), Some("A")]);

        session.move_roi(0, Point::new(100.0, 0.0)).unwrap();
        assert_eq!(roi_names(&session), vec![None, None]);
        assert_eq!(session.rois()[0].points[0], Point::new(100.0, 0.0));
        assert_eq!(numbers(&session, "Type 1"), vec![1, 2]);

        assert!(session.move_roi(3, Point::new(0.0, 0.0)).is_err());
        assert!(session.move_roi_vertex(0, 9, Point::new(0.0, 0.0)).is_err());
    }
}
