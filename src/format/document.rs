//! Coordinate document: the JSON interchange form of a session.
//!
//! ```json
//! {
//!   "image": "slice_04.tif",
//!   "image_size": {"width": 1024, "height": 768},
//!   "adjustments": {"brightness": {"r": 0, "g": 10, "b": 0}, "contrast": {..}, "noise_reduction": {..}},
//!   "rois": [{"name": "Cortex", "color": "#ffff00", "line_width": 2, "points": [{"x": 1.0, "y": 2.0}]}],
//!   "markers": [{"cell_type": "NeuN", "marker_number": 1, "x": 3.5, "y": 4.0, "roi": "Cortex"}],
//!   "summary": {"NeuN": {"Cortex": 1}}
//! }
//! ```
//!
//! Reading is lenient: every key may be missing and falls back to a
//! default value. Missing adjustment values keep the session's current
//! setting. Only marker and ROI point coordinates are required.

use serde::{Deserialize, Serialize};

use crate::adjust::{Adjustments, Channel, ChannelValues};
use crate::color_utils::to_hex;
use crate::constants::{DEFAULT_ROI_LINE_WIDTH, FALLBACK_CELL_TYPE, FALLBACK_ROI_NAME};
use crate::model::Point;
use crate::session::{Session, SummaryTable};

/// Everything the coordinate file stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateDocument {
    /// File name of the annotated image.
    #[serde(default = "unknown_image")]
    pub image: String,

    #[serde(default)]
    pub image_size: ImageSize,

    #[serde(default)]
    pub adjustments: AdjustmentsEntry,

    /// Closed ROIs in creation order.
    #[serde(default)]
    pub rois: Vec<RoiEntry>,

    /// Markers that lie inside an ROI, in list order.
    #[serde(default)]
    pub markers: Vec<MarkerEntry>,

    /// Derived counts. Ignored on import.
    #[serde(default)]
    pub summary: SummaryTable,
}

fn unknown_image() -> String {
    "Unknown".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageSize {
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// Per-channel values where each channel may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelEntry<T> {
    pub r: Option<T>,
    pub g: Option<T>,
    pub b: Option<T>,
}

impl<T: Copy> ChannelEntry<T> {
    fn from_values(values: ChannelValues<T>) -> Self {
        Self {
            r: Some(values.r),
            g: Some(values.g),
            b: Some(values.b),
        }
    }

    /// Value for `channel`, or `default` if absent.
    pub fn get_or(&self, channel: Channel, default: T) -> T {
        match channel {
            Channel::Red => self.r,
            Channel::Green => self.g,
            Channel::Blue => self.b,
        }
        .unwrap_or(default)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AdjustmentsEntry {
    #[serde(default)]
    pub brightness: ChannelEntry<i64>,
    #[serde(default)]
    pub contrast: ChannelEntry<f64>,
    #[serde(default)]
    pub noise_reduction: ChannelEntry<i64>,
}

impl From<&Adjustments> for AdjustmentsEntry {
    fn from(adj: &Adjustments) -> Self {
        let b = adj.brightness_values();
        let c = adj.contrast_values();
        let n = adj.noise_reduction_values();
        Self {
            brightness: ChannelEntry::from_values(ChannelValues {
                r: i64::from(b.r),
                g: i64::from(b.g),
                b: i64::from(b.b),
            }),
            contrast: ChannelEntry::from_values(c),
            noise_reduction: ChannelEntry::from_values(ChannelValues {
                r: i64::from(n.r),
                g: i64::from(n.g),
                b: i64::from(n.b),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiEntry {
    #[serde(default = "fallback_roi_name")]
    pub name: String,
    /// Hex color. Unparseable values fall back to the default on import.
    #[serde(default = "default_roi_color")]
    pub color: String,
    #[serde(default = "default_line_width")]
    pub line_width: u32,
    #[serde(default)]
    pub points: Vec<PointEntry>,
}

fn fallback_roi_name() -> String {
    FALLBACK_ROI_NAME.to_string()
}

fn default_roi_color() -> String {
    to_hex(crate::constants::DEFAULT_ROI_COLOR)
}

fn default_line_width() -> u32 {
    DEFAULT_ROI_LINE_WIDTH
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointEntry {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for PointEntry {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<PointEntry> for Point {
    fn from(p: PointEntry) -> Self {
        Point::new(p.x, p.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerEntry {
    #[serde(default = "fallback_cell_type")]
    pub cell_type: String,
    /// Informational. Numbers are reassigned on import.
    #[serde(default)]
    pub marker_number: u32,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub roi: Option<String>,
}

fn fallback_cell_type() -> String {
    FALLBACK_CELL_TYPE.to_string()
}

impl CoordinateDocument {
    /// Snapshot a session. Markers outside every ROI are left out.
    pub fn from_session(session: &Session) -> Self {
        let image_size = session
            .image()
            .map(|i| ImageSize {
                width: i.width,
                height: i.height,
            })
            .unwrap_or_default();

        let rois = session
            .rois()
            .iter()
            .map(|roi| RoiEntry {
                name: roi.name.clone(),
                color: to_hex(roi.color),
                line_width: roi.line_width,
                points: roi.points.iter().copied().map(PointEntry::from).collect(),
            })
            .collect();

        let markers = session
            .markers()
            .iter()
            .filter_map(|m| {
                let roi = m.roi_name.clone()?;
                Some(MarkerEntry {
                    cell_type: m.cell_type.clone(),
                    marker_number: m.marker_number,
                    x: m.position.x,
                    y: m.position.y,
                    roi: Some(roi),
                })
            })
            .collect();

        Self {
            image: session.image_name().to_string(),
            image_size,
            adjustments: AdjustmentsEntry::from(session.adjustments()),
            rois,
            markers,
            summary: session.summary(),
        }
    }
}
