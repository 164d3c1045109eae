//! Global constants for the fluorocount engine

/// Hit radius for marker and ROI vertex selection (in image pixels).
pub const HIT_THRESHOLD: f64 = 15.0;

/// Minimum number of points for an ROI to be closed and used for membership.
pub const MIN_ROI_POINTS: usize = 3;

/// Default ROI outline color.
pub const DEFAULT_ROI_COLOR: [u8; 3] = [255, 255, 0];

/// Default ROI outline width in pixels.
pub const DEFAULT_ROI_LINE_WIDTH: u32 = 2;

/// Default marker size for new cell types.
pub const DEFAULT_MARKER_SIZE: u32 = 20;

/// Allowed marker size range.
pub const MARKER_SIZE_MIN: u32 = 5;
pub const MARKER_SIZE_MAX: u32 = 100;

/// Radius of the `Dot` marker glyph, independent of marker size.
pub const DOT_RADIUS: u32 = 3;

/// Outline width for circle and rectangle marker glyphs.
pub const MARKER_OUTLINE_WIDTH: u32 = 2;

/// Color given to cell types created implicitly by a coordinate import.
pub const IMPORTED_CELL_TYPE_COLOR: [u8; 3] = [255, 255, 255];

/// Cell type name used when an imported marker has none.
pub const FALLBACK_CELL_TYPE: &str = "Type 1";

/// Fallback ROI name for imported ROIs without a name.
pub const FALLBACK_ROI_NAME: &str = "ROI";

/// Adjustment ranges and neutral values.
pub mod adjust {
    pub const BRIGHTNESS_MIN: i32 = -100;
    pub const BRIGHTNESS_MAX: i32 = 100;
    /// One brightness step in 8-bit intensity units.
    pub const BRIGHTNESS_SCALE: f64 = 2.55;

    pub const CONTRAST_MIN: f64 = 0.1;
    pub const CONTRAST_MAX: f64 = 3.0;
    pub const NEUTRAL_CONTRAST: f64 = 1.0;
    /// Contrast scales around this intensity.
    pub const CONTRAST_PIVOT: f32 = 128.0;

    pub const NOISE_MAX: u8 = 10;
    /// Gaussian sigma per noise-reduction step.
    pub const NOISE_SIGMA_PER_STEP: f64 = 0.2;
    /// Kernel half-width in standard deviations.
    pub const GAUSSIAN_TRUNCATE: f64 = 4.0;
}

/// Text burned into overlay images.
pub mod labels {
    /// Marker number height in pixels.
    pub const MARKER_LABEL_SIZE: f32 = 14.0;
    /// ROI name height in pixels.
    pub const ROI_LABEL_SIZE: f32 = 10.0;
    /// ROI names sit this far above the first vertex.
    pub const ROI_LABEL_OFFSET: f32 = 15.0;

    /// Searched in order for a label font.
    pub const SYSTEM_FONT_PATHS: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/DejaVuSans.ttf",
        "/System/Library/Fonts/Helvetica.ttc",
        "C:\\Windows\\Fonts\\arialbd.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];
}

/// File name suffixes for exported artifacts.
pub mod export {
    pub const COORDINATES_SUFFIX: &str = "_coordinates.json";
    pub const RESULTS_SUFFIX: &str = "_results.csv";
    pub const OVERLAY_SUFFIX: &str = "_overlay.png";
}
