//! Annotation session: the single owner of all annotation state for the
//! currently loaded image.
//!
//! Every change goes through a `Session` method. Methods either apply fully
//! or return an [`EngineError`](crate::error::EngineError) and leave the
//! session as it was. Derived state (marker membership, per-type counts)
//! is refreshed before a mutating method returns.
//!
//! The methods are split over several files by concern:
//! - `cell_types.rs`: defining, renaming and deleting cell types
//! - `markers.rs`: placing, moving, deleting and restoring markers
//! - `rois.rs`: the ROI drawing state machine and ROI edits
//! - `summary.rs`: count tables

mod cell_types;
mod markers;
mod rois;
mod summary;

use image::RgbImage;

use crate::adjust::{
    Adjustments, Channel, ChannelMask, ChannelMode, apply_adjustments, apply_channel_mask,
};
use crate::config::EngineConfig;
use crate::constants::IMPORTED_CELL_TYPE_COLOR;
use crate::history::MarkerHistory;
use crate::model::{CellMarker, CellType, Point, Roi, default_cell_types, next_number};
use crate::overlay::{MarkerGlyph, MarkerOverlay, OverlayGeometry, RoiOutline};
use crate::spatial;

pub use summary::{ResultRow, SummaryTable};

/// Name and pixel size of the loaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

/// Validated annotation state ready to replace the session's contents.
#[derive(Debug, Clone, Default)]
pub(crate) struct ImportedState {
    /// Closed ROIs in creation order.
    pub rois: Vec<Roi>,
    /// Markers in document order. Numbers are reassigned on commit.
    pub markers: Vec<CellMarker>,
    pub adjustments: Adjustments,
    /// Image described by the document, adopted when none is loaded.
    pub image: Option<ImageInfo>,
}

/// What an import commit changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CommitReport {
    /// Cell types created because markers referenced them.
    pub created_cell_types: Vec<String>,
    /// Markers whose ROI differed from the one recorded in the document.
    pub reassigned_markers: usize,
}

#[derive(Debug, Clone)]
pub struct Session {
    config: EngineConfig,
    cell_types: Vec<CellType>,
    current_cell_type: Option<String>,
    markers: Vec<CellMarker>,
    /// Closed ROIs in creation order.
    rois: Vec<Roi>,
    /// The ROI receiving points from the draw tool.
    drawing: Option<Roi>,
    history: MarkerHistory,
    /// ROI names seen on earlier images, oldest first.
    roi_name_history: Vec<String>,
    adjustments: Adjustments,
    channel_mask: ChannelMask,
    image: Option<ImageInfo>,
    selected_marker: Option<usize>,
}

impl Default for Session {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session seeded with the configured cell types.
    ///
    /// Duplicate names are skipped. An empty list falls back to the
    /// built-in defaults so at least one cell type always exists.
    pub fn with_config(config: EngineConfig) -> Self {
        let mut cell_types: Vec<CellType> = Vec::new();
        for ct in &config.default_cell_types {
            let name = ct.name.trim();
            if name.is_empty() || cell_types.iter().any(|c| c.name == name) {
                log::warn!("Skipping configured cell type '{}'", ct.name);
                continue;
            }
            let mut ct = ct.clone().with_size(ct.marker_size);
            ct.name = name.to_string();
            ct.count = 0;
            cell_types.push(ct);
        }
        if cell_types.is_empty() {
            cell_types = default_cell_types();
        }
        let current_cell_type = cell_types.first().map(|c| c.name.clone());

        Self {
            config,
            cell_types,
            current_cell_type,
            markers: Vec::new(),
            rois: Vec::new(),
            drawing: None,
            history: MarkerHistory::new(),
            roi_name_history: Vec::new(),
            adjustments: Adjustments::default(),
            channel_mask: ChannelMask::all_enabled(),
            image: None,
            selected_marker: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn image(&self) -> Option<&ImageInfo> {
        self.image.as_ref()
    }

    /// Name used for the image in exports.
    pub fn image_name(&self) -> &str {
        self.image.as_ref().map_or("Unknown", |i| i.name.as_str())
    }

    pub fn cell_types(&self) -> &[CellType] {
        &self.cell_types
    }

    pub fn cell_type(&self, name: &str) -> Option<&CellType> {
        self.cell_types.iter().find(|c| c.name == name)
    }

    pub fn current_cell_type(&self) -> Option<&str> {
        self.current_cell_type.as_deref()
    }

    pub fn markers(&self) -> &[CellMarker] {
        &self.markers
    }

    /// Closed ROIs in creation order.
    pub fn rois(&self) -> &[Roi] {
        &self.rois
    }

    pub fn roi(&self, name: &str) -> Option<&Roi> {
        self.rois.iter().find(|r| r.name == name)
    }

    /// The ROI currently being drawn.
    pub fn drawing_roi(&self) -> Option<&Roi> {
        self.drawing.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing.is_some()
    }

    pub fn history(&self) -> &MarkerHistory {
        &self.history
    }

    pub fn roi_name_history(&self) -> &[String] {
        &self.roi_name_history
    }

    /// Most recently used ROI name from earlier images.
    pub fn suggested_roi_name(&self) -> Option<&str> {
        self.roi_name_history.last().map(String::as_str)
    }

    pub fn selected_marker(&self) -> Option<usize> {
        self.selected_marker
    }

    pub fn hit_threshold(&self) -> f64 {
        self.config.hit_threshold
    }

    // ========================================================================
    // Image lifecycle
    // ========================================================================

    /// Start annotating a new image.
    ///
    /// Names of the current ROIs, including one still being drawn, go into
    /// the name history. Markers, ROIs, the deleted-marker history and the
    /// selection are cleared. Cell types persist. Adjustments are reset
    /// unless the config preserves them.
    pub fn load_image(&mut self, name: impl Into<String>, width: u32, height: u32) {
        let name = name.into();
        for roi in self.rois.iter().chain(self.drawing.iter()) {
            if !roi.name.is_empty() && !self.roi_name_history.contains(&roi.name) {
                self.roi_name_history.push(roi.name.clone());
            }
        }

        self.clear_annotations();
        self.channel_mask = ChannelMask::all_enabled();
        if !self.config.preserve_adjustments_on_load {
            self.adjustments.reset_all();
        }
        log::debug!("Loaded image '{name}' ({width}x{height})");
        self.image = Some(ImageInfo {
            name,
            width,
            height,
        });
    }

    fn clear_annotations(&mut self) {
        self.markers.clear();
        self.rois.clear();
        self.drawing = None;
        self.history.clear();
        self.selected_marker = None;
        self.refresh_counts();
    }

    /// Replace all annotation state with validated imported data.
    pub(crate) fn commit_import(&mut self, state: ImportedState) -> CommitReport {
        let mut report = CommitReport::default();
        self.clear_annotations();
        self.rois = state.rois;

        for mut marker in state.markers {
            if self.cell_type(&marker.cell_type).is_none() {
                log::debug!("Creating cell type '{}' for imported markers", marker.cell_type);
                self.cell_types.push(CellType::new(
                    marker.cell_type.clone(),
                    IMPORTED_CELL_TYPE_COLOR,
                ));
                report.created_cell_types.push(marker.cell_type.clone());
            }
            marker.marker_number = next_number(&self.markers, &marker.cell_type);
            self.markers.push(marker);
        }
        if self.current_cell_type.is_none() {
            self.current_cell_type = self.cell_types.first().map(|c| c.name.clone());
        }

        report.reassigned_markers = self.refresh_membership();
        self.adjustments = state.adjustments;
        if self.image.is_none() {
            self.image = state.image;
        }
        self.refresh_counts();
        report
    }

    // ========================================================================
    // Adjustments and display
    // ========================================================================

    pub fn adjustments(&self) -> &Adjustments {
        &self.adjustments
    }

    /// Adjustment setters clamp on their own, so direct access is safe.
    pub fn adjustments_mut(&mut self) -> &mut Adjustments {
        &mut self.adjustments
    }

    pub fn channel_mask(&self) -> ChannelMask {
        self.channel_mask
    }

    pub fn set_channel_mask(&mut self, mask: ChannelMask) {
        self.channel_mask = mask;
    }

    pub fn set_channel_mode(&mut self, mode: ChannelMode) {
        log::debug!("Channel mode: {}", mode.name());
        self.channel_mask = mode.mask();
    }

    pub fn toggle_channel(&mut self, channel: Channel) {
        self.channel_mask.toggle(channel);
    }

    /// Adjust a raw image and apply the channel mask.
    pub fn render(&self, raw: &RgbImage) -> RgbImage {
        let adjusted = apply_adjustments(raw, &self.adjustments);
        apply_channel_mask(&adjusted, self.channel_mask)
    }

    /// Everything a renderer needs to draw ROIs and markers.
    pub fn overlay_geometry(&self) -> OverlayGeometry {
        let rois = self
            .rois
            .iter()
            .chain(self.drawing.iter())
            .map(RoiOutline::from)
            .collect();

        let markers = self
            .markers
            .iter()
            .enumerate()
            .filter_map(|(idx, marker)| {
                let ct = self.cell_type(&marker.cell_type)?;
                Some(MarkerOverlay {
                    position: marker.position,
                    color: ct.color,
                    glyph: MarkerGlyph::for_shape(ct.marker_shape, ct.marker_size),
                    marker_size: ct.marker_size,
                    label: marker.marker_number.to_string(),
                    label_position: ct.label_position,
                    selected: self.selected_marker == Some(idx),
                })
            })
            .collect();

        OverlayGeometry { rois, markers }
    }

    // ========================================================================
    // Spatial queries
    // ========================================================================

    /// Marker under `point`, first created wins.
    pub fn marker_at(&self, point: &Point) -> Option<usize> {
        spatial::find_marker_at(&self.markers, point, self.config.hit_threshold)
    }

    /// Closed-ROI vertex under `point` as `(roi_index, vertex_index)`.
    pub fn roi_vertex_at(&self, point: &Point) -> Option<(usize, usize)> {
        spatial::find_roi_vertex_at(&self.rois, point, self.config.hit_threshold)
    }

    /// Closed ROI whose interior contains `point`.
    pub fn roi_at(&self, point: &Point) -> Option<usize> {
        spatial::find_roi_at(&self.rois, point)
    }

    // ========================================================================
    // Derived state
    // ========================================================================

    /// Re-resolve every marker's ROI. Returns how many changed.
    fn refresh_membership(&mut self) -> usize {
        let changed = spatial::refresh_membership(&mut self.markers, &self.rois);
        if changed > 0 {
            log::debug!("Membership changed for {changed} marker(s)");
        }
        changed
    }

    fn refresh_counts(&mut self) {
        for ct in &mut self.cell_types {
            ct.count = self.markers.iter().filter(|m| m.cell_type == ct.name).count();
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use image::Rgb;

    #[test]
    fn test_new_session_has_default_types() {
        let session = Session::new();
        assert_eq!(session.cell_types().len(), 2);
        assert_eq!(session.current_cell_type(), Some("Type 1"));
        assert!(session.image().is_none());
        assert_eq!(session.image_name(), "Unknown");
    }

    #[test]
    fn test_config_seeds_cell_types() {
        let mut config = EngineConfig::default();
        config.default_cell_types = vec![
            CellType::new("NeuN", [255, 0, 0]),
            CellType::new("NeuN", [0, 255, 0]),
            CellType::new("  ", [0, 0, 255]),
        ];
        let session = Session::with_config(config.clone());
        assert_eq!(session.cell_types().len(), 1);
        assert_eq!(session.cell_types()[0].color, [255, 0, 0]);

        config.default_cell_types.clear();
        let session = Session::with_config(config);
        assert_eq!(session.cell_types().len(), 2);
    }

    #[test]
    fn test_load_image_clears_and_records_names() {
        let mut session = Session::new();
        session.load_image("a.tif", 100, 100);
        square(&mut session, "Cortex", 0.0, 0.0, 50.0);
        mark(&mut session, "Type 1", 10.0, 10.0);
        session.start_roi("Open").unwrap();
        session.adjustments_mut().set_brightness(Channel::Red, 40);
        session.set_channel_mode(ChannelMode::Green);

        session.load_image("b.tif", 64, 32);
        assert!(session.markers().is_empty());
        assert!(session.rois().is_empty());
        assert!(!session.is_drawing());
        assert_eq!(session.roi_name_history(), ["Cortex", "Open"]);
        assert_eq!(session.suggested_roi_name(), Some("Open"));
        assert_eq!(session.cell_types().len(), 2);
        assert_eq!(session.cell_types()[0].count, 0);
        assert_eq!(session.channel_mask(), ChannelMask::all_enabled());
        assert_eq!(session.adjustments().brightness(Channel::Red), 40);
        assert_eq!(
            session.image(),
            Some(&ImageInfo {
                name: "b.tif".into(),
                width: 64,
                height: 32
            })
        );

        square(&mut session, "Cortex", 0.0, 0.0, 10.0);
        session.start_roi("Striatum").unwrap();
        session.load_image("c.tif", 1, 1);
        assert_eq!(session.roi_name_history(), ["Cortex", "Open", "Striatum"]);
    }

    #[test]
    fn test_load_image_can_reset_adjustments() {
        let mut config = EngineConfig::default();
        config.preserve_adjustments_on_load = false;
        let mut session = Session::with_config(config);
        session.adjustments_mut().set_contrast(Channel::Blue, 2.0);
        session.load_image("x.png", 1, 1);
        assert!(session.adjustments().is_neutral());
    }

    #[test]
    fn test_render_applies_mask_after_adjustments() {
        let mut session = Session::new();
        session.adjustments_mut().set_brightness(Channel::Green, 10);
        session.set_channel_mode(ChannelMode::Green);
        let raw = RgbImage::from_pixel(3, 2, Rgb([50, 100, 150]));
        let out = session.render(&raw);
        assert!(out.pixels().all(|p| p.0 == [0, 125, 0]));
        assert_eq!(raw.get_pixel(0, 0).0, [50, 100, 150]);
    }

    #[test]
    fn test_overlay_geometry() {
        let mut session = Session::new();
        square(&mut session, "A", 0.0, 0.0, 10.0);
        session.start_roi("B").unwrap();
        session.add_roi_point(Point::new(20.0, 20.0)).unwrap();
        let idx = mark(&mut session, "Type 2", 5.0, 5.0);
        session.select_marker(Some(idx)).unwrap();

        let geometry = session.overlay_geometry();
        assert_eq!(geometry.rois.len(), 2);
        assert!(geometry.rois[0].closed);
        assert!(!geometry.rois[1].closed);
        assert_eq!(geometry.markers.len(), 1);
        assert_eq!(geometry.markers[0].label, "1");
        assert_eq!(geometry.markers[0].color, [100, 255, 100]);
        assert_eq!(geometry.markers[0].glyph, MarkerGlyph::Circle { radius: 10 });
        assert!(geometry.markers[0].selected);
    }

    #[test]
    fn test_spatial_queries_use_threshold() {
        let mut session = Session::new();
        square(&mut session, "A", 0.0, 0.0, 100.0);
        mark(&mut session, "Type 1", 50.0, 50.0);
        assert_eq!(session.marker_at(&Point::new(60.0, 50.0)), Some(0));
        assert_eq!(session.marker_at(&Point::new(66.0, 50.0)), None);
        assert_eq!(session.roi_vertex_at(&Point::new(98.0, 3.0)), Some((0, 1)));
        assert_eq!(session.roi_at(&Point::new(50.0, 50.0)), Some(0));
        assert_eq!(session.roi_at(&Point::new(150.0, 50.0)), None);
    }
}
