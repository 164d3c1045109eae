//! Trait definitions for export formats.

use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::format::error::FormatError;
use crate::session::Session;

/// An artifact written from a session.
///
/// Implemented by the coordinate document, the results CSV and the overlay
/// image. Only the coordinate document can be read back.
pub trait ExportFormat {
    /// Unique identifier for this format (e.g., "json", "csv", "overlay").
    fn id(&self) -> &'static str;

    /// Human-readable name for messages.
    fn display_name(&self) -> &'static str;

    /// Suffix appended to the image stem, extension included.
    fn suffix(&self) -> &'static str;

    /// Write the artifact to `path`.
    ///
    /// `image` is the raw image, needed only by formats that render pixels.
    fn export(
        &self,
        session: &Session,
        image: Option<&RgbImage>,
        path: &Path,
    ) -> Result<ExportResult, FormatError>;
}

/// Which artifacts [`export_all`](crate::format::export_all) writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub coordinates: bool,
    pub results: bool,
    pub overlay: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            coordinates: true,
            results: true,
            overlay: true,
        }
    }
}

impl ExportOptions {
    /// Create new export options with every artifact enabled.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coordinates(mut self, enabled: bool) -> Self {
        self.coordinates = enabled;
        self
    }

    pub fn results(mut self, enabled: bool) -> Self {
        self.results = enabled;
        self
    }

    pub fn overlay(mut self, enabled: bool) -> Self {
        self.overlay = enabled;
        self
    }
}

/// Result of an export operation.
#[derive(Debug, Default)]
pub struct ExportResult {
    /// Number of ROIs written.
    pub rois_exported: usize,

    /// Number of markers written.
    pub markers_exported: usize,

    /// Warnings generated during export (e.g., skipped artifacts).
    pub warnings: Vec<FormatWarning>,

    /// Files created during export.
    pub files_created: Vec<PathBuf>,
}

impl ExportResult {
    /// Create a new export result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning to the result.
    pub fn add_warning(&mut self, warning: FormatWarning) {
        self.warnings.push(warning);
    }

    /// Check if there were any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Fold another result into this one.
    pub fn merge(&mut self, other: ExportResult) {
        self.rois_exported = self.rois_exported.max(other.rois_exported);
        self.markers_exported = self.markers_exported.max(other.markers_exported);
        self.warnings.extend(other.warnings);
        self.files_created.extend(other.files_created);
    }
}

/// Result of a coordinate import.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub rois_imported: usize,
    pub markers_imported: usize,

    /// Cell types created because imported markers referenced them.
    pub created_cell_types: Vec<String>,

    /// Corrections applied while reading the document.
    pub warnings: Vec<FormatWarning>,
}

impl ImportReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Warning generated during format conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatWarning {
    /// Human-readable warning message.
    pub message: String,

    /// Severity level of the warning.
    pub severity: WarningSeverity,
}

impl FormatWarning {
    /// Create a new warning.
    pub fn new(message: impl Into<String>, severity: WarningSeverity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    /// Create an info-level warning.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, WarningSeverity::Info)
    }

    /// Create a warning-level warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, WarningSeverity::Warning)
    }
}

impl std::fmt::Display for FormatWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.severity {
            WarningSeverity::Info => write!(f, "{}", self.message),
            WarningSeverity::Warning => write!(f, "warning: {}", self.message),
        }
    }
}

/// Severity level for format warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    /// Informational message, not a problem.
    Info,
    /// Something was skipped or modified.
    Warning,
}
