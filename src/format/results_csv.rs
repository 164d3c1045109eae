//! Results CSV: per-marker details followed by per-ROI counts.
//!
//! ```text
//! === Marker Details ===
//! Image,Cell Type,Marker #,X,Y,ROI
//! slice.tif,NeuN,1,10.50,20.00,Cortex
//!
//! === Summary (per ROI) ===
//! Image,ROI,Cell Type,Count
//! slice.tif,Cortex,NeuN,1
//! slice.tif,Cortex,GFAP,0
//! ```

use std::path::Path;

use image::RgbImage;

use crate::constants::export::RESULTS_SUFFIX;
use crate::format::error::FormatError;
use crate::format::traits::{ExportFormat, ExportResult};
use crate::session::Session;

/// `<stem>_results.csv`.
pub struct ResultsCsv;

impl ResultsCsv {
    /// Render the CSV into memory.
    ///
    /// Only markers inside an ROI are listed. The summary covers every
    /// closed ROI crossed with every cell type, zeros included.
    pub fn to_bytes(session: &Session) -> Result<Vec<u8>, FormatError> {
        let image = session.image_name();
        let mut out = Vec::new();

        {
            let mut writer = csv::WriterBuilder::new()
                .flexible(true)
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(&mut out);
            writer.write_record(["=== Marker Details ==="])?;
            writer.write_record(["Image", "Cell Type", "Marker #", "X", "Y", "ROI"])?;
            for marker in session.markers() {
                let Some(roi) = marker.roi_name.as_deref() else {
                    continue;
                };
                let number = marker.marker_number.to_string();
                let x = format!("{:.2}", marker.position.x);
                let y = format!("{:.2}", marker.position.y);
                writer.write_record([
                    image,
                    marker.cell_type.as_str(),
                    number.as_str(),
                    x.as_str(),
                    y.as_str(),
                    roi,
                ])?;
            }
            writer.flush()?;
        }

        // Separator row, written raw so it stays completely empty.
        out.push(b'\n');

        {
            let mut writer = csv::WriterBuilder::new()
                .flexible(true)
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(&mut out);
            writer.write_record(["=== Summary (per ROI) ==="])?;
            writer.write_record(["Image", "ROI", "Cell Type", "Count"])?;
            let summary = session.summary();
            for (roi, cell_type, count) in summary.by_roi() {
                let count = count.to_string();
                writer.write_record([image, roi, cell_type, count.as_str()])?;
            }
            writer.flush()?;
        }

        Ok(out)
    }
}

impl ExportFormat for ResultsCsv {
    fn id(&self) -> &'static str {
        "csv"
    }

    fn display_name(&self) -> &'static str {
        "Results (CSV)"
    }

    fn suffix(&self) -> &'static str {
        RESULTS_SUFFIX
    }

    fn export(
        &self,
        session: &Session,
        _image: Option<&RgbImage>,
        path: &Path,
    ) -> Result<ExportResult, FormatError> {
        let bytes = Self::to_bytes(session)?;
        std::fs::write(path, bytes)?;

        let mut result = ExportResult::new();
        result.rois_exported = session.rois().len();
        result.markers_exported = session
            .markers()
            .iter()
            .filter(|m| m.roi_name.is_some())
            .count();
        result.files_created.push(path.to_path_buf());

        log::info!(
            "Exported results for {} markers to {:?}",
            result.markers_exported,
            path
        );
        Ok(result)
    }
}
