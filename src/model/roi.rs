//! Regions of interest: user-drawn polygons that scope marker counts.

use super::geometry::{Point, polygon_contains};
use crate::color_utils::Rgb;
use crate::constants::{DEFAULT_ROI_COLOR, DEFAULT_ROI_LINE_WIDTH, MIN_ROI_POINTS};

/// A named polygon. Points are kept in drawing order.
#[derive(Debug, Clone, PartialEq)]
pub struct Roi {
    pub name: String,
    pub points: Vec<Point>,
    pub color: Rgb,
    pub line_width: u32,
    pub closed: bool,
}

impl Roi {
    /// Create an open ROI with no points.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
            color: DEFAULT_ROI_COLOR,
            line_width: DEFAULT_ROI_LINE_WIDTH,
            closed: false,
        }
    }

    pub fn with_style(mut self, color: Rgb, line_width: u32) -> Self {
        self.color = color;
        self.line_width = line_width.max(1);
        self
    }

    /// Whether this ROI takes part in hit testing and membership.
    pub fn is_closed_polygon(&self) -> bool {
        self.closed && self.points.len() >= MIN_ROI_POINTS
    }

    /// Even-odd containment. Open or degenerate ROIs contain nothing.
    pub fn contains(&self, point: &Point) -> bool {
        self.is_closed_polygon() && polygon_contains(&self.points, point)
    }

    /// Shift every point by `delta`.
    pub fn translate(&mut self, delta: Point) {
        for p in &mut self.points {
            *p = p.translated(delta);
        }
    }
}
