//! Coordinate JSON: the one artifact that can be read back into a session.
//!
//! Import validates the whole document before the session is touched. A
//! document that fails validation leaves the session exactly as it was.

use std::collections::HashSet;
use std::path::Path;

use image::RgbImage;

use crate::adjust::{Adjustments, Channel};
use crate::color_utils::parse_hex;
use crate::constants::export::COORDINATES_SUFFIX;
use crate::constants::{FALLBACK_CELL_TYPE, MIN_ROI_POINTS};
use crate::format::document::{AdjustmentsEntry, CoordinateDocument};
use crate::format::error::FormatError;
use crate::format::traits::{ExportFormat, ExportResult, FormatWarning, ImportReport};
use crate::model::{CellMarker, Point, Roi};
use crate::session::{ImageInfo, ImportedState, Session};

/// `<stem>_coordinates.json`.
pub struct CoordinateJson;

impl ExportFormat for CoordinateJson {
    fn id(&self) -> &'static str {
        "json"
    }

    fn display_name(&self) -> &'static str {
        "Coordinates (JSON)"
    }

    fn suffix(&self) -> &'static str {
        COORDINATES_SUFFIX
    }

    fn export(
        &self,
        session: &Session,
        _image: Option<&RgbImage>,
        path: &Path,
    ) -> Result<ExportResult, FormatError> {
        let doc = CoordinateDocument::from_session(session);
        let json = serde_json::to_string_pretty(&doc)?;
        std::fs::write(path, json)?;

        log::info!(
            "Exported {} ROIs and {} markers to {:?}",
            doc.rois.len(),
            doc.markers.len(),
            path
        );

        let mut result = ExportResult::new();
        result.rois_exported = doc.rois.len();
        result.markers_exported = doc.markers.len();
        let skipped = session.markers().len() - doc.markers.len();
        if skipped > 0 {
            result.add_warning(FormatWarning::info(format!(
                "{skipped} marker(s) outside every ROI were not exported"
            )));
        }
        result.files_created.push(path.to_path_buf());
        Ok(result)
    }
}

impl CoordinateJson {
    /// Serialize a session to a pretty-printed coordinate document.
    pub fn export_string(session: &Session) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(
            &CoordinateDocument::from_session(session),
        )?)
    }

    pub fn parse(json: &str) -> Result<CoordinateDocument, FormatError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a coordinate file and replace the session's annotations with it.
    pub fn import_file(session: &mut Session, path: &Path) -> Result<ImportReport, FormatError> {
        log::info!("Importing coordinates from {:?}", path);
        let json = std::fs::read_to_string(path)?;
        let doc = Self::parse(&json)?;
        Self::import_document(session, doc)
    }

    /// Replace the session's annotations with `doc`.
    ///
    /// Clears then loads; nothing is merged. Marker numbers and ROI
    /// membership are derived again from document order and geometry.
    pub fn import_document(
        session: &mut Session,
        doc: CoordinateDocument,
    ) -> Result<ImportReport, FormatError> {
        let mut warnings = Vec::new();
        let state = validate(doc, session, &mut warnings)?;

        let rois_imported = state.rois.len();
        let markers_imported = state.markers.len();
        let commit = session.commit_import(state);

        if commit.reassigned_markers > 0 {
            warnings.push(FormatWarning::warning(format!(
                "{} marker(s) were assigned to a different ROI than recorded",
                commit.reassigned_markers
            )));
        }
        for w in &warnings {
            log::warn!("{}", w.message);
        }
        log::info!(
            "Imported {} ROIs and {} markers ({} new cell types)",
            rois_imported,
            markers_imported,
            commit.created_cell_types.len()
        );

        Ok(ImportReport {
            rois_imported,
            markers_imported,
            created_cell_types: commit.created_cell_types,
            warnings,
        })
    }
}

fn validate(
    doc: CoordinateDocument,
    session: &Session,
    warnings: &mut Vec<FormatWarning>,
) -> Result<ImportedState, FormatError> {
    let default_color = session.config().default_roi_color;
    let mut seen = HashSet::new();
    let mut rois = Vec::with_capacity(doc.rois.len());

    for entry in doc.rois {
        let name = entry.name.trim().to_string();
        if name.is_empty() {
            return Err(FormatError::invalid_format("ROI with an empty name"));
        }
        if !seen.insert(name.clone()) {
            return Err(FormatError::invalid_format(format!(
                "duplicate ROI name '{name}'"
            )));
        }
        if entry.points.len() < MIN_ROI_POINTS {
            return Err(FormatError::invalid_format(format!(
                "ROI '{}' has {} point(s), needs at least {}",
                name,
                entry.points.len(),
                MIN_ROI_POINTS
            )));
        }

        let points: Vec<Point> = entry.points.into_iter().map(Point::from).collect();
        if let Some(p) = points.iter().find(|p| !p.is_finite()) {
            return Err(FormatError::invalid_coordinates(format!(
                "ROI '{name}' has point ({}, {})",
                p.x, p.y
            )));
        }

        let color = parse_hex(&entry.color).unwrap_or_else(|| {
            warnings.push(FormatWarning::warning(format!(
                "ROI '{}' has invalid color '{}', using default",
                name, entry.color
            )));
            default_color
        });
        let line_width = if entry.line_width == 0 {
            warnings.push(FormatWarning::warning(format!(
                "ROI '{name}' line width 0 raised to 1"
            )));
            1
        } else {
            entry.line_width
        };

        let mut roi = Roi::new(name).with_style(color, line_width);
        roi.points = points;
        roi.closed = true;
        rois.push(roi);
    }

    let mut markers = Vec::with_capacity(doc.markers.len());
    for (idx, entry) in doc.markers.into_iter().enumerate() {
        let position = Point::new(entry.x, entry.y);
        if !position.is_finite() {
            return Err(FormatError::invalid_coordinates(format!(
                "marker {} is at ({}, {})",
                idx + 1,
                entry.x,
                entry.y
            )));
        }
        let cell_type = match entry.cell_type.trim() {
            "" => {
                warnings.push(FormatWarning::warning(format!(
                    "marker {} has no cell type, using '{FALLBACK_CELL_TYPE}'",
                    idx + 1
                )));
                FALLBACK_CELL_TYPE.to_string()
            }
            name => name.to_string(),
        };
        let mut marker = CellMarker::new(position, cell_type, 0);
        marker.roi_name = entry.roi;
        markers.push(marker);
    }

    let adjustments = read_adjustments(&doc.adjustments, session.adjustments(), warnings);
    let image = (doc.image_size.width > 0 && doc.image_size.height > 0).then(|| ImageInfo {
        name: doc.image,
        width: doc.image_size.width,
        height: doc.image_size.height,
    });

    Ok(ImportedState {
        rois,
        markers,
        adjustments,
        image,
    })
}

/// Values missing from the document keep their `current` setting.
fn read_adjustments(
    entry: &AdjustmentsEntry,
    current: &Adjustments,
    warnings: &mut Vec<FormatWarning>,
) -> Adjustments {
    let mut adj = *current;
    for channel in Channel::all() {
        let letter = channel.letter();

        let raw = entry.brightness.get_or(channel, i64::from(current.brightness(channel)));
        let stored = adj.set_brightness(channel, saturate(raw));
        if i64::from(stored) != raw {
            warnings.push(FormatWarning::warning(format!(
                "brightness {letter} = {raw} clamped to {stored}"
            )));
        }

        let raw = entry.contrast.get_or(channel, current.contrast(channel));
        let stored = adj.set_contrast(channel, raw);
        if stored != raw {
            warnings.push(FormatWarning::warning(format!(
                "contrast {letter} = {raw} clamped to {stored}"
            )));
        }

        let raw = entry
            .noise_reduction
            .get_or(channel, i64::from(current.noise_reduction(channel)));
        let stored = adj.set_noise_reduction(channel, saturate(raw));
        if i64::from(stored) != raw {
            warnings.push(FormatWarning::warning(format!(
                "noise reduction {letter} = {raw} clamped to {stored}"
            )));
        }
    }
    adj
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
