//! Cell type definitions: a counting category with its own appearance and
//! its own marker numbering sequence.

use serde::{Deserialize, Serialize};

use crate::color_utils::{self, Rgb};
use crate::constants::{DEFAULT_MARKER_SIZE, MARKER_SIZE_MAX, MARKER_SIZE_MIN};

/// How markers of a cell type are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkerShape {
    /// Small filled dot of fixed size.
    Dot,
    /// Outlined circle with diameter `marker_size`.
    #[default]
    Circle,
    /// Outlined square with side `marker_size`.
    Rectangle,
}

impl MarkerShape {
    /// Get the display name for this shape.
    pub fn name(&self) -> &'static str {
        match self {
            MarkerShape::Dot => "Dot",
            MarkerShape::Circle => "Circle",
            MarkerShape::Rectangle => "Rectangle",
        }
    }

    /// Get all marker shapes.
    pub fn all() -> &'static [MarkerShape] {
        &[MarkerShape::Dot, MarkerShape::Circle, MarkerShape::Rectangle]
    }
}

/// Where the marker number label sits relative to the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPosition {
    #[default]
    Right,
    Left,
    Top,
    Bottom,
    TopRight,
    TopLeft,
    BottomRight,
    BottomLeft,
}

impl LabelPosition {
    /// Gap between the marker edge and its label.
    const GAP: f64 = 2.0;

    /// Top-left corner of a `text_w` x `text_h` label for a marker of
    /// `marker_size` centered at (`cx`, `cy`).
    pub fn label_origin(
        &self,
        cx: f64,
        cy: f64,
        marker_size: f64,
        text_w: f64,
        text_h: f64,
    ) -> (f64, f64) {
        let half = marker_size / 2.0;
        let right = cx + half + Self::GAP;
        let left = cx - half - text_w - Self::GAP;
        match self {
            LabelPosition::Right => (right, cy - text_h / 2.0),
            LabelPosition::Left => (left, cy - text_h / 2.0),
            LabelPosition::Top => (cx - text_w / 2.0, cy - half - text_h - Self::GAP),
            LabelPosition::Bottom => (cx - text_w / 2.0, cy + half + Self::GAP),
            LabelPosition::TopRight => (right, cy - half - text_h),
            LabelPosition::TopLeft => (left, cy - half - text_h),
            LabelPosition::BottomRight => (right, cy + half),
            LabelPosition::BottomLeft => (left, cy + half),
        }
    }
}

/// A user-defined category of markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellType {
    /// Unique name; markers reference their type by this value.
    pub name: String,
    /// Marker and label color.
    #[serde(with = "color_utils::hex_serde")]
    pub color: Rgb,
    pub marker_shape: MarkerShape,
    /// Marker extent in image pixels.
    pub marker_size: u32,
    #[serde(default)]
    pub label_position: LabelPosition,
    /// Number of markers of this type. Derived, refreshed by the session.
    #[serde(skip)]
    pub count: usize,
}

impl CellType {
    /// Create a new circle-marker cell type with the given name and color.
    pub fn new(name: impl Into<String>, color: Rgb) -> Self {
        Self {
            name: name.into(),
            color,
            marker_shape: MarkerShape::default(),
            marker_size: DEFAULT_MARKER_SIZE,
            label_position: LabelPosition::default(),
            count: 0,
        }
    }

    pub fn with_shape(mut self, shape: MarkerShape) -> Self {
        self.marker_shape = shape;
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.marker_size = clamp_marker_size(size);
        self
    }

    pub fn with_label_position(mut self, position: LabelPosition) -> Self {
        self.label_position = position;
        self
    }
}

/// Clamp a marker size into the supported range.
pub fn clamp_marker_size(size: u32) -> u32 {
    size.clamp(MARKER_SIZE_MIN, MARKER_SIZE_MAX)
}

/// Default cell types for a fresh session.
pub fn default_cell_types() -> Vec<CellType> {
    vec![
        CellType::new("Type 1", [255, 100, 100]),
        CellType::new("Type 2", [100, 255, 100]),
    ]
}
