//! fluorocount - cell counting and ROI annotation for fluorescence
//! microscope images.
//!
//! A [`Session`] owns the annotation state for one image: cell types,
//! numbered markers, polygonal regions of interest and per-channel display
//! adjustments. Marker membership in ROIs is kept consistent through every
//! edit. The [`format`] module exports coordinates, result tables and
//! overlay images, and reads coordinate files back.

pub mod adjust;
pub mod color_utils;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod history;
pub mod image_io;
pub mod model;
pub mod overlay;
pub mod session;
pub mod spatial;

pub use adjust::{Adjustments, Channel, ChannelMask, ChannelMode};
pub use config::{ConfigError, EngineConfig, LogLevel};
pub use error::{EngineError, EngineResult, EntityKind, ErrorCategory};
pub use model::{CellMarker, CellType, LabelPosition, MarkerShape, Point, Roi};
pub use session::{ImageInfo, ResultRow, Session, SummaryTable};
