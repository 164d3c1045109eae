//! Overlay image export and the combined export bundle.

use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::adjust::apply_adjustments;
use crate::constants::export::{COORDINATES_SUFFIX, OVERLAY_SUFFIX};
use crate::format::error::FormatError;
use crate::format::json::CoordinateJson;
use crate::format::results_csv::ResultsCsv;
use crate::format::traits::{ExportFormat, ExportOptions, ExportResult, FormatWarning};
use crate::overlay::burn_overlay;
use crate::session::Session;

/// `<stem>_overlay.png`: the adjusted image with closed ROIs, markers and
/// their labels drawn on top.
///
/// The display channel mask is not applied, so the artifact does not depend
/// on which channels happen to be visible.
pub struct OverlayPng;

impl ExportFormat for OverlayPng {
    fn id(&self) -> &'static str {
        "overlay"
    }

    fn display_name(&self) -> &'static str {
        "Overlay (PNG)"
    }

    fn suffix(&self) -> &'static str {
        OVERLAY_SUFFIX
    }

    fn export(
        &self,
        session: &Session,
        image: Option<&RgbImage>,
        path: &Path,
    ) -> Result<ExportResult, FormatError> {
        let Some(raw) = image else {
            return Err(FormatError::nothing_to_export("no image to draw the overlay on"));
        };

        let mut geometry = session.overlay_geometry();
        geometry.rois.retain(|roi| roi.closed);
        let adjusted = apply_adjustments(raw, session.adjustments());
        let rendered = burn_overlay(&adjusted, &geometry);
        rendered.save_with_format(path, image::ImageFormat::Png)?;
        log::info!(
            "Wrote {}x{} overlay to {:?}",
            rendered.width(),
            rendered.height(),
            path
        );

        let mut result = ExportResult::new();
        result.rois_exported = session.rois().len();
        result.markers_exported = session.markers().len();
        result.files_created.push(path.to_path_buf());
        Ok(result)
    }
}

/// Write the selected artifacts to `dir` as `<stem><suffix>`.
///
/// Refuses when the session has no closed ROI. A missing image skips the
/// overlay with a warning instead of failing the whole bundle.
pub fn export_all(
    session: &Session,
    image: Option<&RgbImage>,
    dir: &Path,
    stem: &str,
    options: &ExportOptions,
) -> Result<ExportResult, FormatError> {
    if session.rois().is_empty() {
        return Err(FormatError::nothing_to_export(
            "draw and close at least one ROI first",
        ));
    }

    let mut formats: Vec<&dyn ExportFormat> = Vec::new();
    if options.coordinates {
        formats.push(&CoordinateJson);
    }
    if options.results {
        formats.push(&ResultsCsv);
    }
    if options.overlay {
        formats.push(&OverlayPng);
    }

    let mut result = ExportResult::new();
    for format in formats {
        if format.id() == OverlayPng.id() && image.is_none() {
            result.add_warning(FormatWarning::warning("no image loaded, overlay skipped"));
            continue;
        }
        let path = dir.join(format!("{stem}{}", format.suffix()));
        log::debug!("Exporting {} to {:?}", format.display_name(), path);
        result.merge(format.export(session, image, &path)?);
    }

    log::info!("Exported {} file(s) to {:?}", result.files_created.len(), dir);
    Ok(result)
}

/// Coordinate file saved next to `image_path` by an earlier export.
pub fn coordinate_file_for(image_path: &Path) -> Option<PathBuf> {
    let stem = image_path.file_stem()?.to_str()?;
    let candidate = image_path.with_file_name(format!("{stem}{COORDINATES_SUFFIX}"));
    candidate.is_file().then_some(candidate)
}
