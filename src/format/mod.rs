//! Reading and writing annotation artifacts.
//!
//! Three artifacts can be exported for an image, each named after the image
//! stem:
//!
//! - **Coordinates** (`_coordinates.json`): ROIs, in-ROI markers, adjustments
//!   and a count summary. The only artifact that can be imported again.
//! - **Results** (`_results.csv`): marker details and per-ROI counts.
//! - **Overlay** (`_overlay.png`): the displayed image with annotations
//!   burned in.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fluorocount::format::{CoordinateJson, ExportOptions, export_all};
//!
//! let result = export_all(&session, Some(&raw), dir, "slice_04", &ExportOptions::new())?;
//! let report = CoordinateJson::import_file(&mut other, &dir.join("slice_04_coordinates.json"))?;
//! ```

mod document;
mod error;
mod export;
mod json;
mod results_csv;
mod traits;

#[cfg(test)]
mod tests;

pub use document::{
    AdjustmentsEntry, ChannelEntry, CoordinateDocument, ImageSize, MarkerEntry, PointEntry,
    RoiEntry,
};
pub use error::FormatError;
pub use export::{OverlayPng, coordinate_file_for, export_all};
pub use json::CoordinateJson;
pub use results_csv::ResultsCsv;
pub use traits::{
    ExportFormat, ExportOptions, ExportResult, FormatWarning, ImportReport, WarningSeverity,
};
