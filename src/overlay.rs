//! Overlay geometry for renderers and burning it into an image.

use std::path::Path;
use std::sync::OnceLock;

use ab_glyph::{Font, FontArc, InvalidFont, PxScale, ScaleFont, point};
use image::{DynamicImage, RgbImage};
use tiny_skia::{Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::color_utils::Rgb;
use crate::constants::labels::{
    MARKER_LABEL_SIZE, ROI_LABEL_OFFSET, ROI_LABEL_SIZE, SYSTEM_FONT_PATHS,
};
use crate::constants::{DOT_RADIUS, MARKER_OUTLINE_WIDTH};
use crate::model::{LabelPosition, MarkerShape, Point, Roi};

/// An ROI outline. Open outlines are the ROI still being drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RoiOutline {
    pub name: String,
    pub color: Rgb,
    pub line_width: u32,
    pub points: Vec<Point>,
    pub closed: bool,
}

impl From<&Roi> for RoiOutline {
    fn from(roi: &Roi) -> Self {
        Self {
            name: roi.name.clone(),
            color: roi.color,
            line_width: roi.line_width,
            points: roi.points.clone(),
            closed: roi.closed,
        }
    }
}

/// Drawing parameters for a marker shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerGlyph {
    /// Filled disc of fixed radius.
    Dot { radius: u32 },
    /// Circle outline.
    Circle { radius: u32 },
    /// Square outline extending `half_side` from the center.
    Rectangle { half_side: u32 },
}

impl MarkerGlyph {
    pub fn for_shape(shape: MarkerShape, marker_size: u32) -> Self {
        match shape {
            MarkerShape::Dot => MarkerGlyph::Dot { radius: DOT_RADIUS },
            MarkerShape::Circle => MarkerGlyph::Circle {
                radius: marker_size / 2,
            },
            MarkerShape::Rectangle => MarkerGlyph::Rectangle {
                half_side: marker_size / 2,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerOverlay {
    pub position: Point,
    pub color: Rgb,
    pub glyph: MarkerGlyph,
    pub marker_size: u32,
    /// Marker number as text.
    pub label: String,
    pub label_position: LabelPosition,
    pub selected: bool,
}

impl MarkerOverlay {
    /// Top-left corner for a label of the given text extent.
    pub fn label_origin(&self, text_w: f64, text_h: f64) -> (f64, f64) {
        self.label_position.label_origin(
            self.position.x,
            self.position.y,
            f64::from(self.marker_size),
            text_w,
            text_h,
        )
    }
}

/// ROIs (closed ones in creation order, then the one being drawn) and
/// markers in list order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayGeometry {
    pub rois: Vec<RoiOutline>,
    pub markers: Vec<MarkerOverlay>,
}

/// Font for marker numbers and ROI names burned into overlays.
#[derive(Clone)]
pub struct LabelFont {
    font: FontArc,
}

impl LabelFont {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, InvalidFont> {
        FontArc::try_from_vec(data).map(|font| Self { font })
    }

    /// Read a TrueType/OpenType file. Unreadable or invalid files give `None`.
    pub fn load(path: &Path) -> Option<Self> {
        let data = std::fs::read(path).ok()?;
        match Self::from_bytes(data) {
            Ok(font) => Some(font),
            Err(e) => {
                log::warn!("Failed to parse font {:?}: {}", path, e);
                None
            }
        }
    }

    /// First usable font from the usual system locations. Looked up once.
    pub fn system() -> Option<&'static LabelFont> {
        static SYSTEM: OnceLock<Option<LabelFont>> = OnceLock::new();
        SYSTEM
            .get_or_init(|| {
                let found = SYSTEM_FONT_PATHS
                    .iter()
                    .map(Path::new)
                    .find_map(LabelFont::load);
                if found.is_none() {
                    log::warn!("No system font found, overlay labels will not be drawn");
                }
                found
            })
            .as_ref()
    }

    /// Advance width and line height of `text` at `size` pixels.
    pub fn measure(&self, text: &str, size: f32) -> (f32, f32) {
        let scaled = self.font.as_scaled(PxScale::from(size));
        let mut width = 0.0;
        let mut prev = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        (width, scaled.height())
    }

    /// Blend `text` into an opaque pixmap with its top-left corner at (x, y).
    fn draw(&self, pixmap: &mut Pixmap, text: &str, x: f32, y: f32, size: f32, color: Rgb) {
        let scale = PxScale::from(size);
        let scaled = self.font.as_scaled(scale);
        let (w, h) = (pixmap.width() as i64, pixmap.height() as i64);
        let data = pixmap.data_mut();

        let mut cursor = x;
        let mut prev = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = prev {
                cursor += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(cursor, y + scaled.ascent()));
            cursor += scaled.h_advance(id);
            prev = Some(id);

            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i64 + i64::from(gx);
                let py = bounds.min.y as i64 + i64::from(gy);
                if px < 0 || py < 0 || px >= w || py >= h {
                    return;
                }
                let idx = ((py * w + px) * 4) as usize;
                let alpha = coverage.clamp(0.0, 1.0);
                for (c, &target) in color.iter().enumerate() {
                    let dst = f32::from(data[idx + c]);
                    data[idx + c] = (dst + (f32::from(target) - dst) * alpha).round() as u8;
                }
            });
        }
    }
}

/// Draw ROI outlines, marker glyphs and their labels onto `image`.
///
/// Labels use [`LabelFont::system`] and are skipped when no font is found.
pub fn burn_overlay(image: &RgbImage, geometry: &OverlayGeometry) -> RgbImage {
    burn_overlay_with_font(image, geometry, LabelFont::system())
}

/// [`burn_overlay`] with an explicit label font. `None` draws shapes only.
pub fn burn_overlay_with_font(
    image: &RgbImage,
    geometry: &OverlayGeometry,
    font: Option<&LabelFont>,
) -> RgbImage {
    let (w, h) = image.dimensions();
    let rgba = DynamicImage::ImageRgb8(image.clone()).to_rgba8();
    let Some(size) = tiny_skia::IntSize::from_wh(w, h) else {
        return image.clone();
    };
    let Some(mut pixmap) = Pixmap::from_vec(rgba.into_raw(), size) else {
        return image.clone();
    };

    for roi in &geometry.rois {
        draw_roi(&mut pixmap, roi);
    }
    for marker in &geometry.markers {
        draw_marker(&mut pixmap, marker);
    }
    if let Some(font) = font {
        for roi in geometry.rois.iter().filter(|r| r.closed) {
            if let Some(first) = roi.points.first() {
                let y = first.y as f32 - ROI_LABEL_OFFSET;
                font.draw(&mut pixmap, &roi.name, first.x as f32, y, ROI_LABEL_SIZE, roi.color);
            }
        }
        for marker in &geometry.markers {
            let (text_w, text_h) = font.measure(&marker.label, MARKER_LABEL_SIZE);
            let (x, y) = marker.label_origin(f64::from(text_w), f64::from(text_h));
            font.draw(
                &mut pixmap,
                &marker.label,
                x as f32,
                y as f32,
                MARKER_LABEL_SIZE,
                marker.color,
            );
        }
    }

    let mut output = RgbImage::new(w, h);
    for (dst, src) in output.pixels_mut().zip(pixmap.data().chunks_exact(4)) {
        dst.0 = [src[0], src[1], src[2]];
    }
    output
}

fn solid(color: Rgb) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], 255);
    paint.anti_alias = true;
    paint
}

fn draw_roi(pixmap: &mut Pixmap, roi: &RoiOutline) {
    let Some((first, rest)) = roi.points.split_first() else {
        return;
    };
    if rest.is_empty() {
        return;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in rest {
        pb.line_to(p.x as f32, p.y as f32);
    }
    if roi.closed {
        pb.close();
    }
    let Some(path) = pb.finish() else {
        return;
    };

    let stroke = Stroke {
        width: roi.line_width.max(1) as f32,
        ..Default::default()
    };
    pixmap.stroke_path(&path, &solid(roi.color), &stroke, Transform::identity(), None);
}

fn draw_marker(pixmap: &mut Pixmap, marker: &MarkerOverlay) {
    let cx = marker.position.x as f32;
    let cy = marker.position.y as f32;
    let paint = solid(marker.color);
    let outline = Stroke {
        width: MARKER_OUTLINE_WIDTH as f32,
        ..Default::default()
    };

    match marker.glyph {
        MarkerGlyph::Dot { radius } => {
            if let Some(path) = PathBuilder::from_circle(cx, cy, radius as f32) {
                pixmap.fill_path(
                    &path,
                    &paint,
                    tiny_skia::FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            }
        }
        MarkerGlyph::Circle { radius } => {
            if let Some(path) = PathBuilder::from_circle(cx, cy, radius as f32) {
                pixmap.stroke_path(&path, &paint, &outline, Transform::identity(), None);
            }
        }
        MarkerGlyph::Rectangle { half_side } => {
            let half = half_side as f32;
            if let Some(rect) =
                tiny_skia::Rect::from_xywh(cx - half, cy - half, half * 2.0, half * 2.0)
            {
                let path = PathBuilder::from_rect(rect);
                pixmap.stroke_path(&path, &paint, &outline, Transform::identity(), None);
            }
        }
    }
}
